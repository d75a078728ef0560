//! The Corner Grocer menu: four fixed actions backed by the scripting module.

use crate::bridge::CallBridge;
use crate::config::{Config, FunctionNames};
use crate::console::LineSource;
use crate::error::BridgeError;
use crate::menu::Menu;
use crate::runtime::ScriptRuntime;
use crate::value::{Arguments, ResultKind};
use anyhow::Result;
use std::io::Write;
use tracing::{debug, info};

/// Menu labels in display order. The position of each label is the number the user
/// types to pick it, see [`Choice::parse`].
pub const GROCER_MENU: [&str; 4] = [
    "List today's item purchases",
    "Find an item's number of purchases today",
    "Chart today's purchases",
    "Exit",
];

const SELECTION_PROMPT: &str = "Enter your selection as a number: ";
const SEARCH_PROMPT: &str = "Type the item's number or name: ";
const UNRECOGNIZED: &str = "Didn't recognize that input. Try again.";
const NOT_FOUND: &str = "Didn't find that item.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    ListItems,
    SearchItem,
    ChartItems,
    Exit,
}

impl Choice {
    /// Accepts exactly one digit between 1 and 4, ignoring surrounding whitespace.
    pub fn parse(entry: &str) -> Option<Choice> {
        let mut chars = entry.trim().chars();
        let (Some(digit), None) = (chars.next(), chars.next()) else {
            return None;
        };
        match digit {
            '1' => Some(Choice::ListItems),
            '2' => Some(Choice::SearchItem),
            '3' => Some(Choice::ChartItems),
            '4' => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Whether the menu loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    Item(String),
    NotFound,
}

/// Interprets the answer to the item prompt.
///
/// A whole number, optionally signed, picks the item at that 1-based position; `0`,
/// negative numbers and positions past the end are not found, however many digits
/// they have. Anything else is taken as the item name itself, trimmed, whether or
/// not it appears in `items`.
pub fn resolve_search(entry: &str, items: &[String]) -> SearchTarget {
    let entry = entry.trim();
    if entry.is_empty() {
        return SearchTarget::NotFound;
    }

    let digits = entry.strip_prefix(['+', '-']).unwrap_or(entry);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return SearchTarget::Item(entry.to_string());
    }
    if entry.starts_with('-') {
        return SearchTarget::NotFound;
    }
    digits
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| items.get(index))
        .map_or(SearchTarget::NotFound, |item| SearchTarget::Item(item.clone()))
}

/// The line reported after counting one item.
pub fn purchase_message(item: &str, count: i64) -> String {
    match count {
        0 => format!("No {item} purchased this day."),
        1 => format!("{item}: 1 purchase this day."),
        n => format!("{item}: {n} purchases this day."),
    }
}

/// Drives the menu: shows it, reads a choice and runs the matching action.
pub struct GrocerMenu<'rt, R: ScriptRuntime> {
    bridge: CallBridge<'rt, R>,
    menu: Menu,
    input_file: String,
    output_file: String,
    functions: FunctionNames,
}

impl<'rt, R: ScriptRuntime> GrocerMenu<'rt, R> {
    pub fn new(bridge: CallBridge<'rt, R>, menu: Menu, config: &Config) -> Self {
        Self {
            bridge,
            menu,
            input_file: config.input.clone(),
            output_file: config.output.clone(),
            functions: config.functions.clone(),
        }
    }

    /// Runs the menu until the user exits or the input ends.
    pub fn run(&self, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
        while self.select(input, out)? == Flow::Continue {}
        Ok(())
    }

    /// One round of the menu.
    ///
    /// Script failures are reported to `out` and the round still ends with
    /// [`Flow::Continue`]; only console errors are returned.
    pub fn select(&self, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<Flow> {
        self.menu.render(out)?;
        out.flush()?;

        let Some(entry) = input.read_line(SELECTION_PROMPT)? else {
            self.exit(out)?;
            return Ok(Flow::Stop);
        };
        let Some(choice) = Choice::parse(&entry) else {
            writeln!(out, "{UNRECOGNIZED}")?;
            return Ok(Flow::Continue);
        };
        debug!(?choice, "menu choice");

        let outcome = match choice {
            Choice::ListItems => self.list_items(),
            Choice::SearchItem => self.search_item(input, out),
            Choice::ChartItems => self.chart_items(),
            Choice::Exit => {
                self.exit(out)?;
                return Ok(Flow::Stop);
            }
        };

        if let Err(err) = outcome {
            match err.downcast_ref::<BridgeError>() {
                Some(failure) => writeln!(out, "Error: {failure}")?,
                None => return Err(err),
            }
        }
        Ok(Flow::Continue)
    }

    /// The script prints the counts itself.
    fn list_items(&self) -> Result<()> {
        self.bridge.invoke(
            &self.functions.count_items,
            &Arguments::Str(self.input_file.clone()),
            ResultKind::Unit,
        )?;
        Ok(())
    }

    fn search_item(&self, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
        let items = self
            .bridge
            .invoke(
                &self.functions.list_items,
                &Arguments::Str(self.input_file.clone()),
                ResultKind::StringList,
            )?
            .into_strings()
            .unwrap_or_default();

        if items.is_empty() {
            writeln!(out, "No items found in {}.", self.input_file)?;
            return Ok(());
        }

        writeln!(out, "Select an item:")?;
        for (index, item) in items.iter().enumerate() {
            writeln!(out, "{}: {}", index + 1, item)?;
        }
        out.flush()?;

        let entry = input.read_line(SEARCH_PROMPT)?.unwrap_or_default();
        let item = match resolve_search(&entry, &items) {
            SearchTarget::Item(item) => item,
            SearchTarget::NotFound => {
                writeln!(out, "{NOT_FOUND}")?;
                return Ok(());
            }
        };

        let count = self
            .bridge
            .invoke(
                &self.functions.count_item,
                &Arguments::StrPair(self.input_file.clone(), item.clone()),
                ResultKind::Int,
            )?
            .as_int()
            .unwrap_or_default();
        writeln!(out, "{}", purchase_message(&item, count))?;
        Ok(())
    }

    /// The script prints the histogram and writes it to the output file.
    fn chart_items(&self) -> Result<()> {
        let status = self.bridge.invoke(
            &self.functions.chart_items,
            &Arguments::StrPair(self.input_file.clone(), self.output_file.clone()),
            ResultKind::Int,
        )?;
        info!(output = %self.output_file, ?status, "histogram written");
        Ok(())
    }

    fn exit(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Exiting...")?;
        writeln!(out, "Goodbye.")?;
        Ok(())
    }
}
