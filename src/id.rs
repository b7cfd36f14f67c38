use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RunnerId {
    value: u64,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ProjectId {
    value: u64,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct GroupId {
    value: u64,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct JobId {
    value: u64,
}

macro_rules! numeric_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: u64) -> Self { Self { value: id } }

            pub fn value(&self) -> u64 { self.value }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self { Self::new(id) }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<$name, D::Error>
                where D: Deserializer<'de>,
            {
                let id = u64::deserialize(deserializer)?;
                Ok($name::new(id))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where S: Serializer,
            {
                serializer.serialize_u64(self.value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map(Self::new)
            }
        }
    };
}

numeric_id!(RunnerId);
numeric_id!(ProjectId);
numeric_id!(GroupId);
numeric_id!(JobId);
