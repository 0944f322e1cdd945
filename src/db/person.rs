use chrono::NaiveDate;
use uuid::Uuid;

use super::{Entity, NullBool};

/// Storage representation of a person.
///
/// A nil `id` means the datastore has not assigned one yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Person {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub removed: NullBool,
}

impl Entity for Person {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}
