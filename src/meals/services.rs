use uuid::Uuid;

use crate::meals::{dto::MealMetrics, repo::MealStore};

/// Longest run of consecutive `true` flags.
pub fn best_on_diet_sequence<I>(flags: I) -> i64
where
    I: IntoIterator<Item = bool>,
{
    let (best, _) = flags.into_iter().fold((0, 0), |(best, current), on_diet| {
        let current = if on_diet { current + 1 } else { 0 };
        (best.max(current), current)
    });
    best
}

/// Recomputed from the full meal history on every call.
pub async fn compute_metrics(meals: &dyn MealStore, user_id: Uuid) -> anyhow::Result<MealMetrics> {
    let total_meals_on_diet = meals.count_by_diet(user_id, true).await?;
    let total_meals_off_diet = meals.count_by_diet(user_id, false).await?;
    let history = meals.list_by_user_newest_first(user_id).await?;

    Ok(MealMetrics {
        total_meals: history.len() as i64,
        total_meals_on_diet,
        total_meals_off_diet,
        best_on_diet_sequence: best_on_diet_sequence(history.iter().map(|m| m.is_on_diet)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo_types::MealFields;
    use crate::memory::MemoryStore;

    #[test]
    fn streak_of_empty_history_is_zero() {
        assert_eq!(best_on_diet_sequence(Vec::new()), 0);
        assert_eq!(best_on_diet_sequence([false, false]), 0);
    }

    #[test]
    fn streak_resets_on_off_diet_meal() {
        assert_eq!(best_on_diet_sequence([false, true, true]), 2);
        assert_eq!(best_on_diet_sequence([true, false, true, true, true, false, true]), 3);
        assert_eq!(best_on_diet_sequence([true; 5]), 5);
    }

    #[test]
    fn streak_length_does_not_depend_on_scan_direction() {
        let flags = [true, true, false, true, true, true, false, true];
        let reversed: Vec<bool> = flags.iter().rev().copied().collect();
        assert_eq!(best_on_diet_sequence(flags), best_on_diet_sequence(reversed));
    }

    fn meal(is_on_diet: bool, date: i64) -> MealFields {
        MealFields {
            name: "Prato".into(),
            description: "Desc".into(),
            is_on_diet,
            date,
        }
    }

    #[tokio::test]
    async fn metrics_follow_date_order_not_insertion_order() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        // Inserted out of date order: by date the history is on, off, on, on.
        store.create(user, meal(true, 4)).await.unwrap();
        store.create(user, meal(true, 1)).await.unwrap();
        store.create(user, meal(false, 2)).await.unwrap();
        store.create(user, meal(true, 3)).await.unwrap();
        store.create(Uuid::new_v4(), meal(true, 5)).await.unwrap();

        let metrics = compute_metrics(&store, user).await.unwrap();
        assert_eq!(
            metrics,
            MealMetrics {
                total_meals: 4,
                total_meals_on_diet: 3,
                total_meals_off_diet: 1,
                best_on_diet_sequence: 2,
            }
        );
    }
}
