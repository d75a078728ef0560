use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("a menu needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("no option at position {position}; the menu has {len}")]
    NoSuchPosition { position: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    label: String,
}

impl MenuOption {
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// An ordered list of labeled options, shown numbered from 1.
///
/// The menu always has a distinct first and last option. Options are only ever
/// added, never removed or edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    options: Vec<MenuOption>,
}

impl Menu {
    pub fn new<I, S>(labels: I) -> Result<Self, MenuError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<MenuOption> = labels
            .into_iter()
            .map(|label| MenuOption {
                label: label.into(),
            })
            .collect();
        if options.len() < 2 {
            return Err(MenuError::TooFewOptions(options.len()));
        }
        Ok(Self { options })
    }

    /// Inserts a new option right after the 1-based `position`.
    pub fn insert_after(
        &mut self,
        position: usize,
        label: impl Into<String>,
    ) -> Result<(), MenuError> {
        if position == 0 || position > self.options.len() {
            return Err(MenuError::NoSuchPosition {
                position,
                len: self.options.len(),
            });
        }
        self.options.insert(
            position,
            MenuOption {
                label: label.into(),
            },
        );
        Ok(())
    }

    /// Appends an option after the current last one.
    pub fn push(&mut self, label: impl Into<String>) {
        self.options.push(MenuOption {
            label: label.into(),
        });
    }

    pub fn head(&self) -> &MenuOption {
        &self.options[0]
    }

    pub fn tail(&self) -> &MenuOption {
        &self.options[self.options.len() - 1]
    }

    /// Option at the 1-based `position`.
    pub fn get(&self, position: usize) -> Option<&MenuOption> {
        position.checked_sub(1).and_then(|index| self.options.get(index))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuOption> {
        self.options.iter()
    }

    /// Writes one `(n) label` line per option.
    pub fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        for (index, option) in self.options.iter().enumerate() {
            writeln!(out, "({}) {}", index + 1, option.label)?;
        }
        Ok(())
    }
}
