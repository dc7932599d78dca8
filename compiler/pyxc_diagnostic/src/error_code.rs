use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### where the first digit is the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Type resolution errors
/// - E3xxx: Semantic errors
/// - E4xxx: Declaration linking errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Malformed number literal
    E0003,
    /// Integer literal too large
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Tabs and spaces mixed in indentation
    E0006,
    /// Dedent to a width that matches no enclosing block
    E0007,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Expected identifier
    E1003,
    /// Expected type
    E1004,
    /// Missing indented block
    E1005,
    /// Struct without fields
    E1006,
    /// Duplicate struct field
    E1007,
    /// Invalid decorator
    E1008,
    /// Invalid operator prototype
    E1009,
    /// Operator declaration conflicts with an existing operator
    E1010,
    /// Trailing comma in `print`
    E1011,
    /// `elif`/`else` without `if`
    E1012,
    /// Unexpected indent
    E1013,
    /// Invalid assignment target
    E1014,
    /// User operator redefines an existing operator of the same arity
    E1015,

    // Type Resolution Errors (E2xxx)
    /// Unknown type name
    E2001,
    /// Array size is not positive
    E2002,
    /// Array size is not an integer literal
    E2003,
    /// Cyclic type definition
    E2004,
    /// `void` used where a value type is required
    E2005,

    // Semantic Errors (E3xxx)
    /// Duplicate struct declaration
    E3001,
    /// Duplicate or clashing alias declaration
    E3002,
    /// Unknown struct field
    E3003,
    /// Member access on a non-struct value
    E3004,
    /// `break`/`continue` outside a loop
    E3005,
    /// Unknown variable
    E3006,
    /// Unknown function
    E3007,
    /// Wrong number of call arguments
    E3008,
    /// Assignment to a constant
    E3009,
    /// Indexing a value that is neither array nor pointer
    E3010,
    /// Conflicting redeclaration of a local
    E3011,
    /// Returning a value from a `void` function
    E3012,
    /// Calling something that is not a function name
    E3013,
    /// `addr(...)` of a value that has no address
    E3014,

    // Linking Errors (E4xxx)
    /// Incompatible signatures for the same name
    E4001,
    /// Function defined more than once
    E4002,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            ErrorCode::E1012 => "E1012",
            ErrorCode::E1013 => "E1013",
            ErrorCode::E1014 => "E1014",
            ErrorCode::E1015 => "E1015",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E3011 => "E3011",
            ErrorCode::E3012 => "E3012",
            ErrorCode::E3013 => "E3013",
            ErrorCode::E3014 => "E3014",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Lexer errors (`LexError`).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Parser errors (`SyntaxError`).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Type resolution errors (`TypeResolutionError`).
    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Semantic errors (`SemanticError`).
    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    /// Declaration linking errors (`SignatureConflictError`).
    pub fn is_linking_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_classification() {
        assert!(ErrorCode::E0006.is_lexer_error());
        assert!(ErrorCode::E1010.is_parser_error());
        assert!(ErrorCode::E2004.is_type_error());
        assert!(ErrorCode::E3005.is_semantic_error());
        assert!(ErrorCode::E4001.is_linking_error());
        assert!(!ErrorCode::E9001.is_linking_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::E2004.to_string(), "E2004");
    }
}
