use std::io::{self, Write};

use console::style;

pub fn info(message: &str) {
    let _ = writeln!(io::stderr(), "{}", message);
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}

pub fn debug(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).dim());
}

pub fn query_op(tool: &str, message: &str) {
    let _ = writeln!(io::stderr(), "{} {}", style(tool).cyan(), style(message).dim());
}
