//! Error codes for resolver diagnostics.
//!
//! Each code is a stable identifier (e.g. `E2001`) used for documentation
//! lookups and for matching diagnostics in tests.

use std::fmt;

/// Error codes for all resolver diagnostics.
///
/// Format: E#### / W#### where the first digit indicates the phase:
/// - E2xxx: Name resolution and type errors
/// - E9xxx: Resolver limits
/// - W2xxx: Resolver warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// No implicit conversion between the found and expected types
    E2001,
    /// Name is not declared in any enclosing scope
    E2002,
    /// Name is already declared in this scope
    E2003,
    /// Declaration depends on itself
    E2004,
    /// Modifier not allowed on this declaration, or conflicting modifiers
    E2005,
    /// Expected a type
    E2006,
    /// Type used where a value is expected
    E2007,
    /// Wrong number of type arguments
    E2008,
    /// Invalid base type
    E2009,
    /// Extending a final class
    E2010,
    /// Extension without a matching declaration
    E2011,
    /// Cannot infer a type
    E2012,
    /// Value of type `void` used
    E2013,
    /// Constant without a value
    E2014,
    /// Impure expression in a pure context
    E2015,
    /// Member not accessible from here
    E2016,
    /// Instance member used without an instance, or static member through one
    E2017,
    /// Reference to an ambiguous symbol
    E2018,
    /// Inherited members cannot be merged
    E2019,
    /// Inherited members disagree on their type
    E2020,
    /// Inherited members disagree on purity
    E2021,
    /// Overriding member without `override`
    E2022,
    /// Overriding a non-virtual member
    E2023,
    /// Override changes the member's type
    E2024,
    /// Override changes the member's purity
    E2025,
    /// `override` with nothing to override
    E2026,
    /// Abstract member left unimplemented
    E2027,
    /// Instantiating an abstract class or interface
    E2028,
    /// Abstract function with a body, or concrete function without one
    E2029,
    /// No operator overload accepts the operands
    E2030,
    /// Several operator overloads match equally well
    E2031,
    /// Operator does not apply to the operand types
    E2032,
    /// Invalid explicit cast
    E2033,
    /// Calling something that is not a function
    E2034,
    /// Wrong number of arguments
    E2035,
    /// Assignment to something that cannot be assigned
    E2036,
    /// Invalid return statement
    E2037,
    /// `break` or `continue` outside a loop
    E2038,
    /// Duplicate switch case
    E2039,
    /// More than one default case
    E2040,
    /// Invalid annotation
    E2041,
    /// No entry point
    E2042,
    /// More than one entry point
    E2043,
    /// Invalid `super` call
    E2044,
    /// Initializer for a member that does not exist
    E2045,
    /// Expression nested too deeply
    E2046,
    /// Expected a constant
    E2047,

    // Limits (E9xxx)
    /// Error limit reached; later errors were dropped
    E9002,

    // Warnings (W2xxx)
    /// Expression result is unused
    W2001,
    /// Modifier written more than once
    W2002,
}

impl ErrorCode {
    /// Every error code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E2016,
        ErrorCode::E2017,
        ErrorCode::E2018,
        ErrorCode::E2019,
        ErrorCode::E2020,
        ErrorCode::E2021,
        ErrorCode::E2022,
        ErrorCode::E2023,
        ErrorCode::E2024,
        ErrorCode::E2025,
        ErrorCode::E2026,
        ErrorCode::E2027,
        ErrorCode::E2028,
        ErrorCode::E2029,
        ErrorCode::E2030,
        ErrorCode::E2031,
        ErrorCode::E2032,
        ErrorCode::E2033,
        ErrorCode::E2034,
        ErrorCode::E2035,
        ErrorCode::E2036,
        ErrorCode::E2037,
        ErrorCode::E2038,
        ErrorCode::E2039,
        ErrorCode::E2040,
        ErrorCode::E2041,
        ErrorCode::E2042,
        ErrorCode::E2043,
        ErrorCode::E2044,
        ErrorCode::E2045,
        ErrorCode::E2046,
        ErrorCode::E2047,
        ErrorCode::E9002,
        ErrorCode::W2001,
        ErrorCode::W2002,
    ];

    /// Get the code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E2019 => "E2019",
            ErrorCode::E2020 => "E2020",
            ErrorCode::E2021 => "E2021",
            ErrorCode::E2022 => "E2022",
            ErrorCode::E2023 => "E2023",
            ErrorCode::E2024 => "E2024",
            ErrorCode::E2025 => "E2025",
            ErrorCode::E2026 => "E2026",
            ErrorCode::E2027 => "E2027",
            ErrorCode::E2028 => "E2028",
            ErrorCode::E2029 => "E2029",
            ErrorCode::E2030 => "E2030",
            ErrorCode::E2031 => "E2031",
            ErrorCode::E2032 => "E2032",
            ErrorCode::E2033 => "E2033",
            ErrorCode::E2034 => "E2034",
            ErrorCode::E2035 => "E2035",
            ErrorCode::E2036 => "E2036",
            ErrorCode::E2037 => "E2037",
            ErrorCode::E2038 => "E2038",
            ErrorCode::E2039 => "E2039",
            ErrorCode::E2040 => "E2040",
            ErrorCode::E2041 => "E2041",
            ErrorCode::E2042 => "E2042",
            ErrorCode::E2043 => "E2043",
            ErrorCode::E2044 => "E2044",
            ErrorCode::E2045 => "E2045",
            ErrorCode::E2046 => "E2046",
            ErrorCode::E2047 => "E2047",
            ErrorCode::E9002 => "E9002",
            ErrorCode::W2001 => "W2001",
            ErrorCode::W2002 => "W2002",
        }
    }

    /// Check if this is an override-related error.
    pub fn is_override_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2022
                | ErrorCode::E2023
                | ErrorCode::E2024
                | ErrorCode::E2025
                | ErrorCode::E2026
        )
    }

    /// Check if this is a member-merge error.
    pub fn is_merge_error(&self) -> bool {
        matches!(self, ErrorCode::E2019 | ErrorCode::E2020 | ErrorCode::E2021)
    }

    /// Check if this reports a resolver limit (E9xxx range) rather than the program.
    pub fn is_limit_error(&self) -> bool {
        matches!(self, ErrorCode::E9002)
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W2001 | ErrorCode::W2002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"` or `"w2001"`.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
