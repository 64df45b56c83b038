pub type CmdResult<T> = setupgen::Result<(T, i32)>;

pub mod generate;
