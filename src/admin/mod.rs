//! Default admin registration: every registered model gets list, change, add
//! and delete views with no customisation.

pub mod forms;

use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        Draft, NewEvent, NewLodging, NewTrip, NewTripDay, NewTripSavedPlace, NewUserTrip, Record,
    },
    services::store::ItineraryStore,
};

use self::forms::{FormData, FromForm};

/// One record rendered for the admin: its label plus one cell per field.
#[derive(Debug, Clone)]
pub struct AdminRow {
    pub id: String,
    pub label: String,
    pub cells: Vec<String>,
}

#[async_trait]
pub trait ModelAdmin: Send + Sync {
    fn model(&self) -> &'static str;
    fn verbose_name(&self) -> &'static str;
    fn fields(&self) -> &'static [&'static str];

    async fn list(&self, store: &ItineraryStore) -> Result<Vec<AdminRow>, AppError>;
    async fn get(&self, store: &ItineraryStore, id: Uuid) -> Result<AdminRow, AppError>;
    async fn create(&self, store: &ItineraryStore, form: &FormData) -> Result<Uuid, AppError>;
    async fn update(
        &self,
        store: &ItineraryStore,
        id: Uuid,
        form: &FormData,
    ) -> Result<(), AppError>;
    async fn delete(&self, store: &ItineraryStore, id: Uuid) -> Result<(), AppError>;
}

pub struct DefaultAdmin<D> {
    _draft: PhantomData<fn() -> D>,
}

impl<D> DefaultAdmin<D> {
    pub fn new() -> Self {
        Self {
            _draft: PhantomData,
        }
    }
}

impl<D> Default for DefaultAdmin<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D> ModelAdmin for DefaultAdmin<D>
where
    D: Draft + FromForm + 'static,
{
    fn model(&self) -> &'static str {
        <D::Record as Record>::MODEL
    }

    fn verbose_name(&self) -> &'static str {
        <D::Record as Record>::VERBOSE_NAME
    }

    fn fields(&self) -> &'static [&'static str] {
        D::COLUMNS
    }

    async fn list(&self, store: &ItineraryStore) -> Result<Vec<AdminRow>, AppError> {
        store
            .list::<D::Record>()
            .await?
            .iter()
            .map(admin_row::<D>)
            .collect()
    }

    async fn get(&self, store: &ItineraryStore, id: Uuid) -> Result<AdminRow, AppError> {
        let record = store.get::<D::Record>(id).await?;
        admin_row::<D>(&record)
    }

    async fn create(&self, store: &ItineraryStore, form: &FormData) -> Result<Uuid, AppError> {
        let draft = D::from_form(form)?;
        let record = store.create(&draft).await?;
        Ok(record.id())
    }

    async fn update(
        &self,
        store: &ItineraryStore,
        id: Uuid,
        form: &FormData,
    ) -> Result<(), AppError> {
        let draft = D::from_form(form)?;
        store.update(id, &draft).await?;
        Ok(())
    }

    async fn delete(&self, store: &ItineraryStore, id: Uuid) -> Result<(), AppError> {
        store.delete::<D::Record>(id).await
    }
}

fn admin_row<D: Draft>(record: &D::Record) -> Result<AdminRow, AppError> {
    let value = serde_json::to_value(record).map_err(|err| AppError::Other(err.into()))?;
    let cells = D::COLUMNS
        .iter()
        .map(|field| display_value(value.get(*field)))
        .collect();
    Ok(AdminRow {
        id: record.id().to_string(),
        label: record.to_string(),
        cells,
    })
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Default)]
pub struct AdminSite {
    models: Vec<Arc<dyn ModelAdmin>>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// The site with every itinerary model registered.
    pub fn itineraries() -> Self {
        let mut site = Self::new();
        site.register::<NewEvent>();
        site.register::<NewLodging>();
        site.register::<NewTrip>();
        site.register::<NewTripDay>();
        site.register::<NewTripSavedPlace>();
        site.register::<NewUserTrip>();
        site
    }

    pub fn register<D>(&mut self)
    where
        D: Draft + FromForm + 'static,
    {
        self.models.push(Arc::new(DefaultAdmin::<D>::new()));
    }

    pub fn models(&self) -> &[Arc<dyn ModelAdmin>] {
        &self.models
    }

    pub fn find(&self, model: &str) -> Result<Arc<dyn ModelAdmin>, AppError> {
        self.models
            .iter()
            .find(|admin| admin.model() == model)
            .cloned()
            .ok_or(AppError::NotFound)
    }
}
