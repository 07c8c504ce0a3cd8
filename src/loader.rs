use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::api_client::{ApiError, DishApi};
use crate::app::FormMode;
use crate::models::{Dish, DishPayload, Restaurant, Tag};

pub type SharedApi = Arc<dyn DishApi>;

/// Results delivered from background tasks to the UI loop.
#[derive(Debug)]
pub enum LoadMessage {
    TagsLoaded(Result<Vec<Tag>, ApiError>),
    RestaurantsLoaded(Result<Vec<Restaurant>, ApiError>),
    DishPrefilled(Result<Dish, ApiError>),
    Submitted(Result<(), ApiError>),
}

/// Start every load the form needs when it is first shown.
pub fn mount(api: &SharedApi, mode: &FormMode, tx: &UnboundedSender<LoadMessage>) {
    spawn_reference_loads(api, tx);
    spawn_prefill(api, mode, tx);
}

/// Fetch tags and restaurants as two independent requests.
pub fn spawn_reference_loads(api: &SharedApi, tx: &UnboundedSender<LoadMessage>) {
    let tags_api = Arc::clone(api);
    let tags_tx = tx.clone();
    tokio::spawn(async move {
        let result = tags_api.fetch_tags().await;
        let _ = tags_tx.send(LoadMessage::TagsLoaded(result));
    });

    let restaurants_api = Arc::clone(api);
    let restaurants_tx = tx.clone();
    tokio::spawn(async move {
        let result = restaurants_api.fetch_restaurants().await;
        let _ = restaurants_tx.send(LoadMessage::RestaurantsLoaded(result));
    });
}

/// In edit mode, fetch the dish being edited. Returns whether a request was
/// issued.
pub fn spawn_prefill(api: &SharedApi, mode: &FormMode, tx: &UnboundedSender<LoadMessage>) -> bool {
    let Some(id) = mode.dish_id() else {
        return false;
    };

    let api = Arc::clone(api);
    let tx = tx.clone();
    let id = id.to_string();
    tokio::spawn(async move {
        let result = api.fetch_dish(&id).await;
        let _ = tx.send(LoadMessage::DishPrefilled(result));
    });
    true
}

/// Send the payload as a create or an update depending on the form mode.
pub async fn submit(api: &dyn DishApi, mode: &FormMode, payload: DishPayload) -> Result<(), ApiError> {
    match mode {
        FormMode::Creating => api.create_dish(payload).await,
        FormMode::Editing(id) => {
            tracing::debug!(dish_id = %id, "updating dish through collection endpoint");
            api.update_dish(payload).await
        }
    }
}

pub fn spawn_submit(
    api: &SharedApi,
    mode: FormMode,
    payload: DishPayload,
    tx: &UnboundedSender<LoadMessage>,
) {
    let api = Arc::clone(api);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = submit(api.as_ref(), &mode, payload).await;
        let _ = tx.send(LoadMessage::Submitted(result));
    });
}
