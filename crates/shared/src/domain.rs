use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl Activity {
    /// Remaining capacity. Negative when the server has over-subscribed the activity.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Full snapshot of `GET /activities`, kept in server key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<(String, Activity)>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, activity: Activity) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = activity,
            None => self.entries.push((name, activity)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, activity)| activity)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Activity> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, activity)| activity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.entries
            .iter()
            .map(|(name, activity)| (name.as_str(), activity))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Activity)> for Directory {
    fn from_iter<I: IntoIterator<Item = (String, Activity)>>(iter: I) -> Self {
        let mut directory = Directory::new();
        for (name, activity) in iter {
            directory.insert(name, activity);
        }
        directory
    }
}

impl Serialize for Directory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, activity) in &self.entries {
            map.serialize_entry(name, activity)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Directory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DirectoryVisitor;

        impl<'de> Visitor<'de> for DirectoryVisitor {
            type Value = Directory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of activity name to activity details")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Directory, A::Error> {
                let mut directory = Directory::new();
                while let Some((name, activity)) = access.next_entry::<String, Activity>()? {
                    directory.insert(name, activity);
                }
                Ok(directory)
            }
        }

        deserializer.deserialize_map(DirectoryVisitor)
    }
}

/// Identity of one rendered participant row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub activity: String,
    pub email: String,
}

impl RowKey {
    pub fn new(activity: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.activity, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_keeps_server_key_order() {
        let raw = r#"{
            "Soccer": {"description":"d","schedule":"s","max_participants":2,"participants":[]},
            "Art Club": {"description":"d","schedule":"s","max_participants":3,"participants":["x@y.z"]},
            "Chess Club": {"description":"d","schedule":"s","max_participants":1,"participants":[]}
        }"#;
        let directory: Directory = serde_json::from_str(raw).expect("directory");
        let names: Vec<&str> = directory.names().collect();
        assert_eq!(names, vec!["Soccer", "Art Club", "Chess Club"]);
    }

    #[test]
    fn spots_left_is_capacity_minus_participants() {
        let activity = Activity {
            description: "Play chess".into(),
            schedule: "Fridays 3-4pm".into(),
            max_participants: 10,
            participants: vec!["a@x.com".into()],
        };
        assert_eq!(activity.spots_left(), 9);

        let full = Activity {
            max_participants: 1,
            participants: vec!["a@x.com".into(), "b@x.com".into()],
            ..activity
        };
        assert_eq!(full.spots_left(), -1);
    }

    #[test]
    fn rejects_activity_with_missing_fields() {
        let raw = r#"{"Chess Club": {"description":"Play chess"}}"#;
        assert!(serde_json::from_str::<Directory>(raw).is_err());
    }

    #[test]
    fn duplicate_keys_keep_first_position_and_last_value() {
        let mut directory = Directory::new();
        let activity = Activity {
            description: "a".into(),
            schedule: "s".into(),
            max_participants: 1,
            participants: Vec::new(),
        };
        directory.insert("A", activity.clone());
        directory.insert("B", activity.clone());
        directory.insert(
            "A",
            Activity {
                max_participants: 5,
                ..activity
            },
        );
        assert_eq!(directory.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(directory.get("A").map(|a| a.max_participants), Some(5));
    }
}
