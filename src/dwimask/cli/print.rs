use colored::*;
use dwimask::commands::{CmdMessage, MessageLevel};
use dwimask::model::Verbosity;

pub fn print_messages(messages: &[CmdMessage], verbosity: Verbosity) {
    for message in messages {
        match message.level {
            MessageLevel::Info if verbosity == Verbosity::Quiet => {}
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub fn print_error(error: &dwimask::error::MaskError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
