#[cfg(feature = "bytecode")]
mod bytecode;
