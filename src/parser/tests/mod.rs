mod error_recovery;
mod expr_parsing;
mod lexer_tests;
mod namespace_parsing;
mod serialize_ast;
