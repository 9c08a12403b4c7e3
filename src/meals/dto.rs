use serde::Serialize;
use serde_json::Value;

use crate::meals::repo_types::{Meal, MealFields};
use crate::validation::{Fields, ValidationErrors};

/// Body of `POST /meals` and `PUT /meals/:mealId`.
///
/// Every field is required and type-checked; the input is rejected as a whole
/// with one issue per offending field.
pub fn parse_meal_body(body: &Value) -> Result<MealFields, ValidationErrors> {
    let mut fields = Fields::new(body)?;
    let name = fields.non_empty_string("name");
    let description = fields.string("description");
    let is_on_diet = fields.boolean("isOnDiet");
    let date = fields.timestamp_millis("date");
    fields.finish()?;

    match (name, description, is_on_diet, date) {
        (Some(name), Some(description), Some(is_on_diet), Some(date)) => Ok(MealFields {
            name,
            description,
            is_on_diet,
            date,
        }),
        _ => Err(ValidationErrors::single("body", "Invalid meal")),
    }
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub meal: Meal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealMetrics {
    pub total_meals: i64,
    pub total_meals_on_diet: i64,
    pub total_meals_off_diet: i64,
    pub best_on_diet_sequence: i64,
}
