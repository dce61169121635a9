#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dishbook_client::{
    AuthGate, ClientError, DevAuthenticator, DishPayload, DishReader, DishWriter, Session,
};
use dishbook_core::dish::Dish;
use dishbook_core::types::DishId;
use tokio::sync::Notify;

/// A gate with a signed-in development session.
pub async fn signed_in_gate() -> Arc<AuthGate> {
    let gate = Arc::new(AuthGate::new(Arc::new(DevAuthenticator)));
    gate.sign_in("cook@example.com", "secret").await.unwrap();
    gate
}

/// A gate nobody has signed in to.
pub fn signed_out_gate() -> Arc<AuthGate> {
    Arc::new(AuthGate::new(Arc::new(DevAuthenticator)))
}

/// In-memory stand-in for both the store and the mutation API.
///
/// Failures are injected one request at a time; `hold_*` makes the matching
/// request wait until the returned [`Notify`] fires.
#[derive(Default)]
pub struct FakeBackend {
    dishes: Mutex<Vec<Dish>>,
    read_failure: Mutex<Option<ClientError>>,
    write_failure: Mutex<Option<ClientError>>,
    held_read: Mutex<Option<(DishId, Arc<Notify>)>>,
    held_write: Mutex<Option<Arc<Notify>>>,
    requests: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a dish directly, bypassing the request counter.
    pub fn seed(&self, name: &str, ingredients: &[&str]) -> Dish {
        let dish = Dish {
            id: uuid::Uuid::new_v4(),
            dish_name: name.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            image_url: None,
            notes: None,
            created_at: Utc::now(),
        };
        self.dishes.lock().unwrap().push(dish.clone());
        dish
    }

    pub fn stored(&self) -> Vec<Dish> {
        self.dishes.lock().unwrap().clone()
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn fail_next_read(&self, err: ClientError) {
        *self.read_failure.lock().unwrap() = Some(err);
    }

    pub fn fail_next_write(&self, err: ClientError) {
        *self.write_failure.lock().unwrap() = Some(err);
    }

    /// Make the next `get_dish(id)` wait for the returned notifier.
    pub fn hold_read(&self, id: DishId) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.held_read.lock().unwrap() = Some((id, Arc::clone(&notify)));
        notify
    }

    /// Make the next write wait for the returned notifier.
    pub fn hold_write(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.held_write.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    async fn begin_write(&self) -> Result<(), ClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let held = self.held_write.lock().unwrap().take();
        if let Some(notify) = held {
            notify.notified().await;
        }
        match self.write_failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> ClientError {
        ClientError::Remote {
            status: Some(404),
            message: "Dish not found".into(),
        }
    }
}

fn image_url(payload: &DishPayload) -> Option<String> {
    payload
        .image
        .as_ref()
        .map(|file| format!("fake://dishes/{}", file.file_name))
}

#[async_trait]
impl DishReader for FakeBackend {
    async fn list_dishes(&self, _session: &Session) -> Result<Vec<Dish>, ClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failure.lock().unwrap().take() {
            return Err(err);
        }
        let mut dishes = self.stored();
        dishes.reverse();
        Ok(dishes)
    }

    async fn get_dish(&self, _session: &Session, id: DishId) -> Result<Option<Dish>, ClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let held = {
            let mut held = self.held_read.lock().unwrap();
            match held.as_ref() {
                Some((held_id, _)) if *held_id == id => held.take().map(|(_, n)| n),
                _ => None,
            }
        };
        if let Some(notify) = held {
            notify.notified().await;
        }
        if let Some(err) = self.read_failure.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.stored().into_iter().find(|dish| dish.id == id))
    }
}

#[async_trait]
impl DishWriter for FakeBackend {
    async fn create_dish(&self, _session: &Session, payload: &DishPayload) -> Result<Dish, ClientError> {
        self.begin_write().await?;
        let dish = Dish {
            id: uuid::Uuid::new_v4(),
            dish_name: payload.dish_name.clone(),
            ingredients: payload.ingredients.clone(),
            image_url: image_url(payload),
            notes: None,
            created_at: Utc::now(),
        };
        self.dishes.lock().unwrap().push(dish.clone());
        Ok(dish)
    }

    async fn update_dish(
        &self,
        _session: &Session,
        id: DishId,
        payload: &DishPayload,
    ) -> Result<Dish, ClientError> {
        self.begin_write().await?;
        let mut dishes = self.dishes.lock().unwrap();
        let dish = dishes
            .iter_mut()
            .find(|dish| dish.id == id)
            .ok_or_else(Self::not_found)?;
        dish.dish_name.clone_from(&payload.dish_name);
        dish.ingredients.clone_from(&payload.ingredients);
        if let Some(url) = image_url(payload) {
            dish.image_url = Some(url);
        }
        Ok(dish.clone())
    }

    async fn delete_dish(&self, _session: &Session, id: DishId) -> Result<(), ClientError> {
        self.begin_write().await?;
        let mut dishes = self.dishes.lock().unwrap();
        let before = dishes.len();
        dishes.retain(|dish| dish.id != id);
        if dishes.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

/// Confirm gates for delete.
pub fn yes(_: &str) -> bool {
    true
}

pub fn no(_: &str) -> bool {
    false
}
