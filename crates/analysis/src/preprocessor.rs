use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag_no_case, take_till, take_till1, take_until, take_while1},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{consumed, map, not, opt, recognize, rest},
    sequence::{delimited, preceded, terminated},
};

use crate::sections::SuspendHeader;

const SUSPEND_DIRECTIVE: &str = "&ANALYZE-SUSPEND";
const RESUME_DIRECTIVE: &str = "&ANALYZE-RESUME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreprocessorNode {
    AnalysisSuspend(SuspendHeader),
    AnalysisResume,
    /// Any other `&` directive, kept verbatim up to the end of its line.
    PreprocessorLine(String),
    /// `{file.i ...}` include reference, braces included.
    Include(String),
    /// `{1}` style positional argument, braces included.
    Argument(String),
    Code(String),
}

impl PreprocessorNode {
    /// Source text carried into the enclosing section, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            PreprocessorNode::AnalysisSuspend(_) | PreprocessorNode::AnalysisResume => None,
            PreprocessorNode::PreprocessorLine(text)
            | PreprocessorNode::Include(text)
            | PreprocessorNode::Argument(text)
            | PreprocessorNode::Code(text) => Some(text),
        }
    }
}

/// A node and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub line: usize,
    pub node: PreprocessorNode,
}

pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;

    while !rest.is_empty() {
        let (remaining, (text, node)) = match consumed(node).parse(rest) {
            Ok(parsed) => parsed,
            Err(_) => ("", (rest, PreprocessorNode::Code(rest.to_string()))),
        };

        tokens.push(Token { line, node });
        line += text.matches('\n').count();
        rest = remaining;
    }

    tokens
}

fn node(input: &str) -> IResult<&str, PreprocessorNode> {
    alt((
        analysis_suspend,
        analysis_resume,
        preprocessor_line,
        argument,
        include,
        unclosed_brace,
        code,
    ))
    .parse(input)
}

/// Matches `name` case-insensitively as a whole word.
pub(crate) fn keyword<'a>(
    name: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag_no_case(name), not(satisfy(|c: char| !c.is_whitespace())))
}

/// Next whitespace-separated word.
pub(crate) fn word(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_while1(|c: char| !c.is_whitespace())).parse(input)
}

fn line_rest(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == '\n').parse(input)
}

fn analysis_suspend(input: &str) -> IResult<&str, PreprocessorNode> {
    map(
        terminated(preceded(keyword(SUSPEND_DIRECTIVE), line_rest), opt(char('\n'))),
        |args| PreprocessorNode::AnalysisSuspend(SuspendHeader::parse(args)),
    )
    .parse(input)
}

fn analysis_resume(input: &str) -> IResult<&str, PreprocessorNode> {
    map(
        terminated(keyword(RESUME_DIRECTIVE), (line_rest, opt(char('\n')))),
        |_| PreprocessorNode::AnalysisResume,
    )
    .parse(input)
}

fn preprocessor_line(input: &str) -> IResult<&str, PreprocessorNode> {
    map(recognize(preceded(char('&'), line_rest)), |line: &str| {
        PreprocessorNode::PreprocessorLine(line.to_string())
    })
    .parse(input)
}

fn argument(input: &str) -> IResult<&str, PreprocessorNode> {
    map(recognize(delimited(char('{'), digit1, char('}'))), |raw: &str| {
        PreprocessorNode::Argument(raw.to_string())
    })
    .parse(input)
}

fn include(input: &str) -> IResult<&str, PreprocessorNode> {
    map(
        recognize(delimited(char('{'), take_until("}"), char('}'))),
        |raw: &str| PreprocessorNode::Include(raw.to_string()),
    )
    .parse(input)
}

/// A `{` with no closing brace swallows the rest of the file as code.
fn unclosed_brace(input: &str) -> IResult<&str, PreprocessorNode> {
    map(recognize(preceded(char('{'), rest)), |text: &str| {
        PreprocessorNode::Code(text.to_string())
    })
    .parse(input)
}

fn code(input: &str) -> IResult<&str, PreprocessorNode> {
    map(take_till1(|c| c == '{' || c == '&'), |text: &str| {
        PreprocessorNode::Code(text.to_string())
    })
    .parse(input)
}
