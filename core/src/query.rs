//! Query-string encoders.
//!
//! Two encodings are supported. `encode_query` is the regular one, used by
//! every list endpoint. `encode_filter_query` expands each pair into the
//! `where[i][col|val|expr]` triplets understood by the filtering endpoints;
//! it writes values verbatim, without percent-encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::params::{QueryParams, QueryValue};

/// URI component set: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Encode parameters as `key=value` pairs joined by `&`, without the `?`.
///
/// Arrays expand to one `key[]=element` pair per element, in order.
/// Undefined entries are skipped. Values are percent-encoded; keys are not.
pub fn encode_query(params: &QueryParams) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params.defined() {
        match value {
            QueryValue::Array(items) => {
                for item in items {
                    pairs.push(format!("{key}[]={}", encode(&item.to_string())));
                }
            }
            other => pairs.push(format!("{key}={}", encode(&other.to_string()))),
        }
    }
    pairs.join("&")
}

/// Encode parameters as equality filters: `where[i][col]=key&where[i][val]=value&where[i][expr]=eq`.
///
/// `i` counts defined entries only, so skipped undefined keys leave no gaps.
pub fn encode_filter_query(params: &QueryParams) -> String {
    params
        .defined()
        .enumerate()
        .map(|(i, (key, value))| {
            format!("where[{i}][col]={key}&where[{i}][val]={value}&where[{i}][expr]=eq")
        })
        .collect::<Vec<_>>()
        .join("&")
}
