use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::multispace0,
    combinator::{all_consuming, map, rest, value},
    sequence::preceded,
};
use serde::{Deserialize, Serialize};

use crate::{
    preprocessor::{keyword, word, Token},
    AnalysisError, PreprocessorNode,
};

/// What an `&ANALYZE-SUSPEND` line announces about the section that follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuspendHeader {
    VersionNumber,
    PreprocessorBlock,
    ProcedureSettings,
    CreateWindow,
    CodeBlock { block_type: CodeBlockType },
    Other { block_type: String },
}

impl SuspendHeader {
    /// Classifies the text following `&ANALYZE-SUSPEND`. Keywords match
    /// case-insensitively.
    pub fn parse(args: &str) -> Self {
        match suspend_header(args) {
            Ok((_, header)) => header,
            Err(_) => SuspendHeader::Other {
                block_type: String::new(),
            },
        }
    }
}

fn suspend_header(input: &str) -> IResult<&str, SuspendHeader> {
    preceded(
        multispace0,
        alt((
            value(SuspendHeader::VersionNumber, keyword("_VERSION-NUMBER")),
            value(
                SuspendHeader::PreprocessorBlock,
                keyword("_UIB-PREPROCESSOR-BLOCK"),
            ),
            value(SuspendHeader::ProcedureSettings, keyword("_PROCEDURE-SETTINGS")),
            value(SuspendHeader::CreateWindow, keyword("_CREATE-WINDOW")),
            map(preceded(keyword("_UIB-CODE-BLOCK"), rest), |args| {
                SuspendHeader::CodeBlock {
                    block_type: CodeBlockType::parse(args),
                }
            }),
            map(word, |block_type: &str| SuspendHeader::Other {
                block_type: block_type.to_string(),
            }),
        )),
    )
    .parse(input)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CodeBlockType {
    Custom { name: String, frame_name: String },
    FunctionForward { name: String, frame_name: String },
    Control { name: String, frame_name: String },
    Procedure { name: String, frame_name: String },
    Function { name: String, frame_name: String },
    Unknown { name: String },
}

impl CodeBlockType {
    /// `args` is e.g. `"_PROCEDURE enable_UI Procedure"`. A known kind without
    /// both a name and a frame name falls back to `Unknown`.
    pub fn parse(args: &str) -> Self {
        let Ok((after_kind, kind)) = word(args) else {
            return CodeBlockType::Unknown {
                name: String::new(),
            };
        };
        let (Ok((_, (name, frame_name))), Ok((_, block))) =
            ((word, word).parse(after_kind), block_kind(kind))
        else {
            return CodeBlockType::Unknown {
                name: kind.to_string(),
            };
        };

        let (name, frame_name) = (name.to_string(), frame_name.to_string());
        match block {
            BlockKind::Custom => CodeBlockType::Custom { name, frame_name },
            BlockKind::FunctionForward => CodeBlockType::FunctionForward { name, frame_name },
            BlockKind::Control => CodeBlockType::Control { name, frame_name },
            BlockKind::Procedure => CodeBlockType::Procedure { name, frame_name },
            BlockKind::Function => CodeBlockType::Function { name, frame_name },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BlockKind {
    Custom,
    FunctionForward,
    Control,
    Procedure,
    Function,
}

fn block_kind(kind: &str) -> IResult<&str, BlockKind> {
    all_consuming(alt((
        value(BlockKind::Custom, tag_no_case("_CUSTOM")),
        value(BlockKind::FunctionForward, tag_no_case("_FUNCTION-FORWARD")),
        value(BlockKind::Control, tag_no_case("_CONTROL")),
        value(BlockKind::Procedure, tag_no_case("_PROCEDURE")),
        value(BlockKind::Function, tag_no_case("_FUNCTION")),
    )))
    .parse(kind)
}

/// One region of an analyzed source file. Serialized with a `type` tag so the
/// browser can recognize `CreateWindow` without knowing the other variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisSection {
    NotInSection {
        contents: String,
    },
    VersionNumber,
    PreprocessorBlock {
        contents: String,
    },
    ProcedureSettings {
        contents: String,
    },
    CreateWindow {
        contents: String,
    },
    CodeBlock {
        block_type: CodeBlockType,
        contents: String,
    },
    Other {
        block_type: String,
        contents: String,
    },
}

impl AnalysisSection {
    fn new(header: SuspendHeader, contents: String) -> Self {
        match header {
            SuspendHeader::VersionNumber => AnalysisSection::VersionNumber,
            SuspendHeader::PreprocessorBlock => AnalysisSection::PreprocessorBlock { contents },
            SuspendHeader::ProcedureSettings => AnalysisSection::ProcedureSettings { contents },
            SuspendHeader::CreateWindow => AnalysisSection::CreateWindow { contents },
            SuspendHeader::CodeBlock { block_type } => {
                AnalysisSection::CodeBlock {
                    block_type,
                    contents,
                }
            }
            SuspendHeader::Other { block_type } => AnalysisSection::Other {
                block_type,
                contents,
            },
        }
    }

    /// Groups tokens into sections. Text between sections becomes
    /// `NotInSection` unless it is blank.
    pub fn from_tokens(
        tokens: impl IntoIterator<Item = Token>,
    ) -> Result<Vec<AnalysisSection>, AnalysisError> {
        let mut sections = Vec::new();
        let mut open: Option<(usize, SuspendHeader)> = None;
        let mut contents = String::new();

        for Token { line, node } in tokens {
            match node {
                PreprocessorNode::AnalysisSuspend(header) => {
                    if let Some((open_line, _)) = open {
                        return Err(AnalysisError::NestedSuspend { line, open_line });
                    }
                    push_loose_text(&mut sections, &mut contents);
                    open = Some((line, header));
                }
                PreprocessorNode::AnalysisResume => {
                    let Some((_, header)) = open.take() else {
                        return Err(AnalysisError::UnmatchedResume { line });
                    };
                    sections.push(AnalysisSection::new(header, std::mem::take(&mut contents)));
                }
                node => {
                    if let Some(text) = node.text() {
                        contents.push_str(text);
                    }
                }
            }
        }

        if let Some((open_line, _)) = open {
            return Err(AnalysisError::UnterminatedSection { open_line });
        }
        push_loose_text(&mut sections, &mut contents);

        Ok(sections)
    }

    pub fn contents(&self) -> Option<&str> {
        match self {
            AnalysisSection::VersionNumber => None,
            AnalysisSection::NotInSection { contents }
            | AnalysisSection::PreprocessorBlock { contents }
            | AnalysisSection::ProcedureSettings { contents }
            | AnalysisSection::CreateWindow { contents }
            | AnalysisSection::CodeBlock { contents, .. }
            | AnalysisSection::Other { contents, .. } => Some(contents),
        }
    }

    /// Name of the inner procedure this section defines, if it is a
    /// `_UIB-CODE-BLOCK _PROCEDURE` block.
    pub fn procedure_name(&self) -> Option<&str> {
        match self {
            AnalysisSection::CodeBlock {
                block_type: CodeBlockType::Procedure { name, .. },
                ..
            } => Some(name),
            _ => None,
        }
    }
}

fn push_loose_text(sections: &mut Vec<AnalysisSection>, contents: &mut String) {
    let text = std::mem::take(contents);
    if !text.trim().is_empty() {
        sections.push(AnalysisSection::NotInSection { contents: text });
    }
}
