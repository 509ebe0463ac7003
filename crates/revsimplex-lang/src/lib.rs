pub mod ast;
pub mod lexer;
pub mod loader;
pub mod parser;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::*;
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use loader::{load_file, load_program, load_str, LoadError};
pub use parser::{ParseError, Parser};
