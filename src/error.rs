use thiserror::Error;

/// Result type alias for interpreter operations
pub type Result<T> = std::result::Result<T, BasicError>;

/// Runtime errors raised by the interpreter.
///
/// Each kind renders as the classic two-letter mnemonic followed by
/// `ERROR`, exactly as the original interpreter printed them. The
/// execution driver prefixes `?` and appends ` IN <line>` when a
/// stored program line was executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BasicError {
    /// NEXT without a matching FOR
    #[error("NF ERROR")]
    NextWithoutFor,

    /// Syntax error
    #[error("SN ERROR")]
    Syntax,

    /// RETURN without a matching GOSUB
    #[error("RG ERROR")]
    ReturnWithoutGosub,

    /// READ past the last DATA item
    #[error("OD ERROR")]
    OutOfData,

    /// Illegal function call (bad argument to a built-in)
    #[error("FC ERROR")]
    IllegalFunction,

    /// Numeric overflow
    #[error("OV ERROR")]
    Overflow,

    /// Out of memory (program buffer or control stack exhausted)
    #[error("OM ERROR")]
    OutOfMemory,

    /// Undefined statement (jump target line does not exist)
    #[error("US ERROR")]
    UndefinedStatement,

    /// Bad subscript (array index out of range or wrong arity)
    #[error("BS ERROR")]
    BadSubscript,

    /// Array dimensioned twice
    #[error("DD ERROR")]
    Redimensioned,

    /// Division by zero
    #[error("/0 ERROR")]
    DivisionByZero,

    /// Statement not allowed in direct mode
    #[error("ID ERROR")]
    IllegalDirect,

    /// Type mismatch between string and numeric
    #[error("TM ERROR")]
    TypeMismatch,

    /// Out of string space
    #[error("LS ERROR")]
    OutOfStringSpace,

    /// String longer than 255 bytes
    #[error("ST ERROR")]
    StringTooLong,

    /// CONT with no resumable stop
    #[error("CN ERROR")]
    CantContinue,

    /// Reference to an undefined user function
    #[error("UF ERROR")]
    UndefinedFunction,
}

impl BasicError {
    /// The bare two-letter mnemonic for this error kind
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BasicError::NextWithoutFor => "NF",
            BasicError::Syntax => "SN",
            BasicError::ReturnWithoutGosub => "RG",
            BasicError::OutOfData => "OD",
            BasicError::IllegalFunction => "FC",
            BasicError::Overflow => "OV",
            BasicError::OutOfMemory => "OM",
            BasicError::UndefinedStatement => "US",
            BasicError::BadSubscript => "BS",
            BasicError::Redimensioned => "DD",
            BasicError::DivisionByZero => "/0",
            BasicError::IllegalDirect => "ID",
            BasicError::TypeMismatch => "TM",
            BasicError::OutOfStringSpace => "LS",
            BasicError::StringTooLong => "ST",
            BasicError::CantContinue => "CN",
            BasicError::UndefinedFunction => "UF",
        }
    }
}
