pub mod grade;
pub mod init;
pub mod tokenize;
pub mod validate;
