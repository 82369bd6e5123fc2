use pest::error::{Error, ErrorVariant, InputLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use super::ast::{CompiledPath, Segment};
use crate::ds::error::PropertyError;

#[derive(Parser)]
#[grammar = "parser/path_grammar.pest"] // relative to src
pub struct PathParser;

/// Compile a property path into its segments.
pub fn parse_path(path: &str) -> Result<CompiledPath, PropertyError> {
    let source = path.trim();
    let mut pairs = PathParser::parse(Rule::path, source).map_err(|e| to_path_error(source, e))?;
    let path_pair = match pairs.next() {
        Some(p) => p,
        None => return Err(PropertyError::invalid_path(source, "empty parse")),
    };
    let mut segments = vec![];
    for pair in path_pair.into_inner() {
        match pair.as_rule() {
            Rule::segment => segments.push(build_segment(source, pair)),
            Rule::EOI => { /* Do nothing */ }
            rule => {
                return Err(PropertyError::invalid_path(
                    source,
                    format!("unexpected {:?}", rule),
                ))
            }
        }
    }
    Ok(CompiledPath {
        source: source.to_string(),
        segments,
    })
}

fn build_segment(source: &str, pair: Pair<Rule>) -> Segment {
    let span = pair.as_span();
    Segment {
        name: span.as_str().trim().to_string(),
        rest: source[span.start()..].trim().to_string(),
    }
}

fn to_path_error(source: &str, e: Error<Rule>) -> PropertyError {
    let position = match e.location {
        InputLocation::Pos(p) => p,
        InputLocation::Span((start, _)) => start,
    };
    let message = match e.variant {
        ErrorVariant::ParsingError { positives, .. } if positives.is_empty() => {
            "unexpected input".to_string()
        }
        ErrorVariant::ParsingError { positives, .. } => format!("expected {:?}", positives),
        ErrorVariant::CustomError { message } => message,
    };
    PropertyError::invalid_path(source, format!("{} at position {}", message, position))
}
