//! Terminal rendering of the conversation state.

use colored::{ColoredString, Colorize};
use visa_core::conversation::{Attachment, ConversationState, Message, VisaRequirement};

pub fn print_welcome() {
    println!("{}", "Welcome to Visa Assistant".bright_blue().bold());
    println!(
        "{}",
        "Tell me your passport country and where you'd like to travel".bright_black()
    );
    println!(
        "{}",
        "Use '/attach <file>' to upload a passport (JPEG, PNG, PDF), '/quit' to exit."
            .bright_black()
    );
    println!();
}

/// Prints the parts of the state that changed since the last call.
///
/// Messages are printed once each, in order. The badge and country summary
/// are printed when an exchange finishes.
#[derive(Default)]
pub struct Renderer {
    rendered: usize,
    loading_shown: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, state: &ConversationState) {
        let fresh = state.messages.len() > self.rendered;
        for message in &state.messages[self.rendered..] {
            print_message(message);
        }
        self.rendered = state.messages.len();

        if state.is_loading {
            if !self.loading_shown {
                println!("{}", "  ...".bright_black());
                self.loading_shown = true;
            }
            return;
        }
        self.loading_shown = false;

        if fresh {
            print_summary(state);
        }
    }
}

fn print_message(message: &Message) {
    if message.is_user() {
        if !message.content().is_empty() {
            println!("{}", format!("> {}", message.content()).green());
        }
        if let Some(file) = message.file() {
            println!("{}", format!("  {}", attachment_label(file)).green());
        }
    } else {
        for line in message.content().lines() {
            println!("{}", line.bright_blue());
        }
    }
}

fn print_summary(state: &ConversationState) {
    if let Some(requirement) = state.badge() {
        println!("  {}", badge(requirement));
    }

    if let (Some(passport), Some(destination)) =
        (&state.passport_country, &state.destination_country)
    {
        println!("{}", format!("  {passport} -> {destination}").bright_black());
    } else if let Some(hints) = detected_hints(state) {
        println!("{}", format!("  {hints}").bright_black());
    }
    println!();
}

/// Colored badge label for a requirement.
pub fn badge(requirement: VisaRequirement) -> ColoredString {
    let label = format!("[ {requirement} ]");
    match requirement {
        VisaRequirement::VisaExempt => label.green().bold(),
        VisaRequirement::VisaOnArrival => label.yellow().bold(),
        VisaRequirement::ApplyOffline => label.red().bold(),
    }
}

pub fn attachment_label(file: &Attachment) -> String {
    let kind = if file.is_image() { "image" } else { "document" };
    format!("[{kind}] {}", file.file_name())
}

fn detected_hints(state: &ConversationState) -> Option<String> {
    match (&state.detected_passport, &state.detected_destination) {
        (None, None) => None,
        (passport, destination) => Some(format!(
            "Detected so far: passport {}, destination {}",
            passport.as_deref().unwrap_or("?"),
            destination.as_deref().unwrap_or("?")
        )),
    }
}
