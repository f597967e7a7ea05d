//! Colored console output for phase progress
//!
//! Plain text and successes go to stdout, warnings and errors to stderr.

use colored::Colorize;

pub fn text(message: impl AsRef<str>) {
    println!("{}", message.as_ref());
}

pub fn success(message: impl AsRef<str>) {
    println!("{}", message.as_ref().green());
}

pub fn warning(message: impl AsRef<str>) {
    eprintln!("{}", message.as_ref().yellow());
}

pub fn warnings(messages: &[String]) {
    for message in messages {
        warning(message);
    }
}

pub fn error(message: impl AsRef<str>) {
    eprintln!("{}", message.as_ref().red());
}
