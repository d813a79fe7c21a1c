/*!
# retrobasic

A Rust interpreter for the 6502-era dialect of Microsoft BASIC, with
tokenized program storage and an interactive REPL.

## Features

- Classic line-numbered programs crunched into single-byte keyword
  opcodes and stored in a sorted, packed line table
- Recursive-descent expression evaluation with the original operator
  precedence, string functions and the two-letter error codes
- FOR/NEXT and GOSUB/RETURN control stacks, READ/DATA/RESTORE,
  STOP/CONT, and plain-text LOAD/SAVE
- Idiomatic Rust API with injected reader/writer handles for embedding
  and testing

## Quick Start

```rust
use retrobasic::Interpreter;

let mut basic = Interpreter::new();
basic.process_line("10 FOR I=1 TO 3");
basic.process_line("20 PRINT I*I");
basic.process_line("30 NEXT I");
basic.process_line("RUN");
```

## Modules

- `error`: the two-letter error kinds and `Result` alias
- `value`: numeric and bounded string values
- `tokenizer`: source text to opcode bytes and back
- `program`: the packed, sorted line store
- `variables` / `arrays`: symbol tables
- `interpreter`: the owning interpreter aggregate
*/

#![warn(missing_docs)]

/// Array storage with row-major flat cells
pub mod arrays;
/// Error types and Result alias
pub mod error;
mod eval;
mod execute;
mod functions;
/// The owning interpreter state
pub mod interpreter;
/// Tokenized program storage
pub mod program;
mod repl;
mod statements;
pub(crate) mod token;
/// Text to opcode-byte-stream conversion and back
pub mod tokenizer;
/// Runtime values: numbers and bounded byte strings
pub mod value;
/// Simple variable storage
pub mod variables;

// Re-export common types
pub use arrays::Arrays;
pub use error::{BasicError, Result};
pub use interpreter::Interpreter;
pub use program::{Program, MAX_LINE_NUMBER, PROGRAM_CAPACITY};
pub use tokenizer::{detokenize, tokenize};
pub use value::{BasicString, Value, ValueType, MAX_STRING_LEN};
pub use variables::{VarName, Variables};
