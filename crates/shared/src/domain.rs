use std::fmt;

use serde::{Deserialize, Serialize};

/// Section type tag the browser singles out as the primary section.
pub const CREATE_WINDOW_SECTION: &str = "CreateWindow";

/// Path of a program as the file server names it, e.g. `src/order.w`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcedurePath(pub String);

impl ProcedurePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcedurePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcedurePath {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProcedurePath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedure_path_serializes_as_plain_string() {
        let path = ProcedurePath::from("src/order-entry.w");
        assert_eq!(
            serde_json::to_string(&path).expect("serialize"),
            r#""src/order-entry.w""#
        );
        assert_eq!(path.to_string(), "src/order-entry.w");
    }
}
