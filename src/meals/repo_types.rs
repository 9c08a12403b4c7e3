use serde::{Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

/// Meal record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "bool_as_int")]
    pub is_on_diet: bool, // exposed as 0/1
    pub date: i64,        // epoch milliseconds
}

/// Fields a client may write; `id` and `user_id` are never part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealFields {
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    pub date: i64,
}

impl Meal {
    pub fn new(id: Uuid, user_id: Uuid, fields: MealFields) -> Self {
        Self {
            id,
            user_id,
            name: fields.name,
            description: fields.description,
            is_on_diet: fields.is_on_diet,
            date: fields.date,
        }
    }

    pub fn apply(&mut self, fields: MealFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.is_on_diet = fields.is_on_diet;
        self.date = fields.date;
    }
}

fn bool_as_int<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_flag_as_integer_and_date_as_millis() {
        let id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let meal = Meal::new(
            id,
            user_id,
            MealFields {
                name: "Prato 1".into(),
                description: "Prato 1 - Desc".into(),
                is_on_diet: true,
                date: 1_609_502_400_000,
            },
        );

        assert_eq!(
            serde_json::to_value(&meal).unwrap(),
            json!({
                "id": id,
                "user_id": user_id,
                "name": "Prato 1",
                "description": "Prato 1 - Desc",
                "is_on_diet": 1,
                "date": 1_609_502_400_000i64,
            })
        );
    }

    #[test]
    fn apply_keeps_identity() {
        let id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let mut meal = Meal::new(
            id,
            user_id,
            MealFields {
                name: "a".into(),
                description: "b".into(),
                is_on_diet: true,
                date: 1,
            },
        );
        meal.apply(MealFields {
            name: "c".into(),
            description: "d".into(),
            is_on_diet: false,
            date: 2,
        });
        assert_eq!((meal.id, meal.user_id), (id, user_id));
        assert_eq!((meal.name.as_str(), meal.is_on_diet, meal.date), ("c", false, 2));
    }
}
