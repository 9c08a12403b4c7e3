use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::meals::{
    repo::MealStore,
    repo_types::{Meal, MealFields},
};
use crate::users::repo::{NewUser, User, UserStore};

/// Process-local store for users and meals. Vectors keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    meals: RwLock<Vec<Meal>>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser, session_id: &str) -> anyhow::Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            session_id: session_id.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn find_by_session_id(&self, session_id: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().rev().find(|u| u.session_id == session_id).cloned())
    }
}

#[async_trait]
impl MealStore for MemoryStore {
    async fn create(&self, user_id: Uuid, fields: MealFields) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        self.meals.write().await.push(Meal::new(id, user_id, fields));
        Ok(id)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals.iter().filter(|m| m.user_id == user_id).cloned().collect())
    }

    async fn list_by_user_newest_first(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let mut meals = self.list_by_user(user_id).await?;
        meals.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(meals)
    }

    async fn count_by_diet(&self, user_id: Uuid, is_on_diet: bool) -> anyhow::Result<i64> {
        let meals = self.meals.read().await;
        let total = meals
            .iter()
            .filter(|m| m.user_id == user_id && m.is_on_diet == is_on_diet)
            .count();
        Ok(total as i64)
    }

    async fn get_by_id(&self, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals.iter().find(|m| m.id == meal_id).cloned())
    }

    async fn update(&self, meal_id: Uuid, fields: MealFields) -> anyhow::Result<()> {
        let mut meals = self.meals.write().await;
        if let Some(meal) = meals.iter_mut().find(|m| m.id == meal_id) {
            meal.apply(fields);
        }
        Ok(())
    }

    async fn delete(&self, meal_id: Uuid) -> anyhow::Result<()> {
        self.meals.write().await.retain(|m| m.id != meal_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, is_on_diet: bool, date: i64) -> MealFields {
        MealFields {
            name: name.into(),
            description: format!("{name} - Desc"),
            is_on_diet,
            date,
        }
    }

    #[tokio::test]
    async fn meals_are_scoped_by_user_and_kept_in_insertion_order() {
        let store = MemoryStore::default();
        let (ricky, other) = (Uuid::new_v4(), Uuid::new_v4());

        MealStore::create(&store, ricky, fields("Prato 2", true, 2)).await.unwrap();
        MealStore::create(&store, other, fields("Alheio", true, 3)).await.unwrap();
        MealStore::create(&store, ricky, fields("Prato 1", false, 1)).await.unwrap();

        let names: Vec<String> = MealStore::list_by_user(&store, ricky)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Prato 2", "Prato 1"]);

        let newest_first: Vec<i64> = store
            .list_by_user_newest_first(ricky)
            .await
            .unwrap()
            .iter()
            .map(|m| m.date)
            .collect();
        assert_eq!(newest_first, vec![2, 1]);
        assert_eq!(store.count_by_diet(ricky, true).await.unwrap(), 1);
        assert_eq!(store.count_by_diet(ricky, false).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn newest_first_keeps_insertion_order_for_equal_dates() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        for (name, date) in [("A", 5), ("B", 7), ("C", 5), ("D", 7)] {
            MealStore::create(&store, user, fields(name, true, date)).await.unwrap();
        }

        let names: Vec<String> = store
            .list_by_user_newest_first(user)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["B", "D", "A", "C"]);
    }

    #[tokio::test]
    async fn update_and_delete_touch_only_the_target_row() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let keep = MealStore::create(&store, user, fields("Keep", true, 1)).await.unwrap();
        let target = MealStore::create(&store, user, fields("Old", true, 1)).await.unwrap();

        store.update(target, fields("New", false, 9)).await.unwrap();
        let updated = store.get_by_id(target).await.unwrap().unwrap();
        assert_eq!((updated.id, updated.user_id), (target, user));
        assert_eq!((updated.name.as_str(), updated.is_on_diet, updated.date), ("New", false, 9));

        store.delete(target).await.unwrap();
        assert!(store.get_by_id(target).await.unwrap().is_none());
        assert!(store.get_by_id(keep).await.unwrap().is_some());

        // Missing ids are a no-op, like a zero-row statement.
        store.update(target, fields("Ghost", true, 1)).await.unwrap();
        store.delete(target).await.unwrap();
        assert!(store.get_by_id(target).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sessions_resolve_to_the_newest_user() {
        let store = MemoryStore::default();
        let new_user = |name: &str| NewUser {
            name: name.into(),
            email: format!("{}@email.com", name.to_lowercase()),
        };

        UserStore::create(&store, new_user("First"), "s-1").await.unwrap();
        let second = UserStore::create(&store, new_user("Second"), "s-1").await.unwrap();

        let found = store.find_by_session_id("s-1").await.unwrap().unwrap();
        assert_eq!(found.id, second.id);
        assert!(store.find_by_session_id("s-2").await.unwrap().is_none());
    }
}
