//! Page model: the activity list, the signup form and the message area.

use std::fmt;

use shared::{
    domain::{Directory, RowKey},
    error::{FormError, SelectError},
};

use crate::message::{MessageArea, MessageKind};

pub const LOADING_TEXT: &str = "Loading activities...";
pub const NO_PARTICIPANTS_TEXT: &str = "No participants yet.";
pub const SELECT_PLACEHOLDER: &str = "Select an activity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityList {
    Loading,
    Failed(String),
    Cards(Vec<ActivityCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub availability: String,
    pub participants: Participants,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Participants {
    Empty,
    Rows(Vec<ParticipantRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub key: RowKey,
}

impl ParticipantRow {
    pub fn email(&self) -> &str {
        &self.key.email
    }
}

/// Closed-set activity picker. Rebuilding it drops the current selection back to the
/// placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectControl {
    options: Vec<String>,
    selected: Option<String>,
}

impl SelectControl {
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.iter().any(|option| option == name)
    }

    pub fn select(&mut self, name: &str) -> Result<(), SelectError> {
        if !self.contains(name) {
            return Err(SelectError(name.to_string()));
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn rebuild<'a>(&mut self, names: impl Iterator<Item = &'a str>) {
        self.options = names.map(str::to_string).collect();
        self.selected = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupSubmission {
    pub activity: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub activity: SelectControl,
}

impl SignupForm {
    pub fn reset(&mut self) {
        self.email.clear();
        self.activity.clear_selection();
    }

    /// Applies the native input constraints: both fields required, email shaped like
    /// `local@domain`.
    pub fn validate(&self) -> Result<SignupSubmission, FormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::MissingEmail);
        }
        if !is_valid_email(email) {
            return Err(FormError::InvalidEmail(email.to_string()));
        }
        let activity = self.activity.selected().ok_or(FormError::MissingActivity)?;
        Ok(SignupSubmission {
            activity: activity.to_string(),
            email: email.to_string(),
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c));
    let domain_ok = !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    local_ok && domain_ok
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub activities: ActivityList,
    pub form: SignupForm,
    pub message: MessageArea,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            activities: ActivityList::Loading,
            form: SignupForm::default(),
            message: MessageArea::default(),
        }
    }
}

impl Page {
    /// Replaces the card list and the select options from one snapshot, in one pass.
    pub fn render_directory(&mut self, directory: &Directory) {
        let cards = directory
            .iter()
            .map(|(name, activity)| ActivityCard {
                name: name.to_string(),
                description: activity.description.clone(),
                schedule: activity.schedule.clone(),
                availability: format!("{} spots left", activity.spots_left()),
                participants: if activity.participants.is_empty() {
                    Participants::Empty
                } else {
                    Participants::Rows(
                        activity
                            .participants
                            .iter()
                            .map(|email| ParticipantRow {
                                key: RowKey::new(name, email.as_str()),
                            })
                            .collect(),
                    )
                },
            })
            .collect();
        self.activities = ActivityList::Cards(cards);
        self.form.activity.rebuild(directory.names());
    }

    /// The select options are left as they are.
    pub fn render_load_failure(&mut self, text: impl Into<String>) {
        self.activities = ActivityList::Failed(text.into());
    }

    /// Removes the first row matching `key`; the card keeps its (possibly empty) list and
    /// its availability text until the next render.
    pub fn remove_row(&mut self, key: &RowKey) -> bool {
        let ActivityList::Cards(cards) = &mut self.activities else {
            return false;
        };
        let Some(card) = cards.iter_mut().find(|card| card.name == key.activity) else {
            return false;
        };
        let Participants::Rows(rows) = &mut card.participants else {
            return false;
        };
        match rows.iter().position(|row| row.key == *key) {
            Some(index) => {
                rows.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains_row(&self, key: &RowKey) -> bool {
        self.rows().any(|row| row.key == *key)
    }

    /// Rendered rows in display order; the CLI numbers rows by this order.
    pub fn row_keys(&self) -> Vec<RowKey> {
        self.rows().map(|row| row.key.clone()).collect()
    }

    pub fn card(&self, name: &str) -> Option<&ActivityCard> {
        match &self.activities {
            ActivityList::Cards(cards) => cards.iter().find(|card| card.name == name),
            _ => None,
        }
    }

    fn rows(&self) -> impl Iterator<Item = &ParticipantRow> {
        let cards: &[ActivityCard] = match &self.activities {
            ActivityList::Cards(cards) => cards,
            _ => &[],
        };
        cards.iter().flat_map(|card| match &card.participants {
            Participants::Rows(rows) => rows.as_slice(),
            Participants::Empty => &[][..],
        })
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Activities")?;
        match &self.activities {
            ActivityList::Loading => writeln!(f, "  {LOADING_TEXT}")?,
            ActivityList::Failed(text) => writeln!(f, "  {text}")?,
            ActivityList::Cards(cards) => {
                let mut row_number = 0;
                for card in cards {
                    writeln!(f, "  [{}]", card.name)?;
                    writeln!(f, "    {}", card.description)?;
                    writeln!(f, "    Schedule: {}", card.schedule)?;
                    writeln!(f, "    Availability: {}", card.availability)?;
                    writeln!(f, "    Participants:")?;
                    match &card.participants {
                        Participants::Empty => writeln!(f, "      {NO_PARTICIPANTS_TEXT}")?,
                        Participants::Rows(rows) => {
                            for row in rows {
                                row_number += 1;
                                writeln!(f, "      #{row_number} {}", row.email())?;
                            }
                        }
                    }
                }
            }
        }

        writeln!(f, "Sign up")?;
        writeln!(
            f,
            "  activity: {}",
            self.form.activity.selected().unwrap_or(SELECT_PLACEHOLDER)
        )?;
        writeln!(f, "  options: {}", self.form.activity.options().join(", "))?;
        writeln!(f, "  email: {}", self.form.email)?;

        if let Some(message) = self.message.current() {
            let tag = match message.kind {
                MessageKind::Success => "ok",
                MessageKind::Error => "error",
            };
            writeln!(f, "({tag}) {}", message.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
