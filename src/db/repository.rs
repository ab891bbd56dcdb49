//! Record services over the key-value store.
//!
//! Every mutation is a full read-modify-write of one collection, serialized
//! by that collection's lock.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::seed::{
    initial_credentials, initial_performance, initial_posts, initial_settings,
    initial_testimonials,
};
use super::store::{keys, Store};
use crate::errors::AppError;
use crate::models::{AdminCredentials, Post, Record, SiteSettings, StudentPerformance, Testimonial};
use crate::notify::SettingsNotifier;

/// One mutation lock per logical collection.
#[derive(Default)]
struct CollectionLocks {
    posts: Mutex<()>,
    performance: Mutex<()>,
    testimonials: Mutex<()>,
    settings: Mutex<()>,
    credentials: Mutex<()>,
}

/// Repository for all record operations.
#[derive(Clone)]
pub struct Repository {
    store: Store,
    locks: Arc<CollectionLocks>,
    notifier: SettingsNotifier,
}

impl Repository {
    pub fn new(store: Store, notifier: SettingsNotifier) -> Self {
        Self {
            store,
            locks: Arc::new(CollectionLocks::default()),
            notifier,
        }
    }

    pub fn notifier(&self) -> &SettingsNotifier {
        &self.notifier
    }

    // ==================== POST OPERATIONS ====================

    /// List all posts, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let _guard = self.locks.posts.lock().await;
        self.store.get(keys::POSTS, initial_posts).await
    }

    /// Get a post by ID.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        Ok(self.list_posts().await?.into_iter().find(|p| p.id == id))
    }

    /// Add a post at the front of the list.
    pub async fn add_post(&self, post: Post) -> Result<(), AppError> {
        let _guard = self.locks.posts.lock().await;
        let mut posts: Vec<Post> = self.store.get(keys::POSTS, initial_posts).await?;
        tracing::info!(id = %post.id, "Adding post");
        posts.insert(0, post);
        self.store.set(keys::POSTS, &posts).await
    }

    /// Replace the post with the same ID. Returns false when no such post exists.
    pub async fn update_post(&self, post: Post) -> Result<bool, AppError> {
        let _guard = self.locks.posts.lock().await;
        let mut posts: Vec<Post> = self.store.get(keys::POSTS, initial_posts).await?;
        if !replace_record(&mut posts, post) {
            return Ok(false);
        }
        self.store.set(keys::POSTS, &posts).await?;
        Ok(true)
    }

    /// Remove a post. Returns false when no such post exists.
    pub async fn delete_post(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.locks.posts.lock().await;
        let mut posts: Vec<Post> = self.store.get(keys::POSTS, initial_posts).await?;
        if !remove_record(&mut posts, id) {
            return Ok(false);
        }
        self.store.set(keys::POSTS, &posts).await?;
        Ok(true)
    }

    // ==================== PERFORMANCE OPERATIONS ====================

    /// List all performance records in stored order.
    pub async fn list_performance(&self) -> Result<Vec<StudentPerformance>, AppError> {
        let _guard = self.locks.performance.lock().await;
        self.store.get(keys::PERFORMANCE, initial_performance).await
    }

    /// Get a performance record by ID.
    pub async fn get_performance(&self, id: &str) -> Result<Option<StudentPerformance>, AppError> {
        Ok(self
            .list_performance()
            .await?
            .into_iter()
            .find(|p| p.id == id))
    }

    /// Append one record and re-sort by year descending.
    pub async fn add_performance(&self, record: StudentPerformance) -> Result<(), AppError> {
        self.bulk_add_performance(vec![record]).await
    }

    /// Append a batch of records and re-sort once by year descending.
    ///
    /// The sort is stable, so equal years keep their existing relative order.
    pub async fn bulk_add_performance(
        &self,
        records: Vec<StudentPerformance>,
    ) -> Result<(), AppError> {
        let _guard = self.locks.performance.lock().await;
        let mut all: Vec<StudentPerformance> =
            self.store.get(keys::PERFORMANCE, initial_performance).await?;
        tracing::info!("Adding {} performance records", records.len());
        all.extend(records);
        all.sort_by(|a, b| b.year.cmp(&a.year));
        self.store.set(keys::PERFORMANCE, &all).await
    }

    /// Replace the record with the same ID in place, without re-sorting.
    pub async fn update_performance(&self, record: StudentPerformance) -> Result<bool, AppError> {
        let _guard = self.locks.performance.lock().await;
        let mut all: Vec<StudentPerformance> =
            self.store.get(keys::PERFORMANCE, initial_performance).await?;
        if !replace_record(&mut all, record) {
            return Ok(false);
        }
        self.store.set(keys::PERFORMANCE, &all).await?;
        Ok(true)
    }

    /// Remove a performance record. Returns false when no such record exists.
    pub async fn delete_performance(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.locks.performance.lock().await;
        let mut all: Vec<StudentPerformance> =
            self.store.get(keys::PERFORMANCE, initial_performance).await?;
        if !remove_record(&mut all, id) {
            return Ok(false);
        }
        self.store.set(keys::PERFORMANCE, &all).await?;
        Ok(true)
    }

    // ==================== TESTIMONIAL OPERATIONS ====================

    /// List all testimonials, newest first.
    pub async fn list_testimonials(&self) -> Result<Vec<Testimonial>, AppError> {
        let _guard = self.locks.testimonials.lock().await;
        self.store.get(keys::TESTIMONIALS, initial_testimonials).await
    }

    /// Add a testimonial at the front of the list.
    pub async fn add_testimonial(&self, testimonial: Testimonial) -> Result<(), AppError> {
        let _guard = self.locks.testimonials.lock().await;
        let mut testimonials: Vec<Testimonial> =
            self.store.get(keys::TESTIMONIALS, initial_testimonials).await?;
        tracing::info!(id = %testimonial.id, "Adding testimonial");
        testimonials.insert(0, testimonial);
        self.store.set(keys::TESTIMONIALS, &testimonials).await
    }

    /// Get a testimonial by ID.
    pub async fn get_testimonial(&self, id: &str) -> Result<Option<Testimonial>, AppError> {
        Ok(self
            .list_testimonials()
            .await?
            .into_iter()
            .find(|t| t.id == id))
    }

    /// Replace the testimonial with the same ID. Returns false when no such testimonial exists.
    pub async fn update_testimonial(&self, testimonial: Testimonial) -> Result<bool, AppError> {
        let _guard = self.locks.testimonials.lock().await;
        let mut testimonials: Vec<Testimonial> =
            self.store.get(keys::TESTIMONIALS, initial_testimonials).await?;
        if !replace_record(&mut testimonials, testimonial) {
            return Ok(false);
        }
        self.store.set(keys::TESTIMONIALS, &testimonials).await?;
        Ok(true)
    }

    /// Remove a testimonial. Returns false when no such testimonial exists.
    pub async fn delete_testimonial(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.locks.testimonials.lock().await;
        let mut testimonials: Vec<Testimonial> =
            self.store.get(keys::TESTIMONIALS, initial_testimonials).await?;
        if !remove_record(&mut testimonials, id) {
            return Ok(false);
        }
        self.store.set(keys::TESTIMONIALS, &testimonials).await?;
        tracing::info!(id, "Testimonial removed");
        Ok(true)
    }

    // ==================== SETTINGS OPERATIONS ====================

    pub async fn get_settings(&self) -> Result<SiteSettings, AppError> {
        let _guard = self.locks.settings.lock().await;
        self.store.get(keys::SETTINGS, initial_settings).await
    }

    /// Replace the site settings and notify subscribers.
    ///
    /// Publishing happens under the settings lock, so subscribers see
    /// snapshots in the order they were stored.
    pub async fn save_settings(&self, settings: SiteSettings) -> Result<(), AppError> {
        let _guard = self.locks.settings.lock().await;
        self.store.set(keys::SETTINGS, &settings).await?;
        tracing::info!("Site settings saved");
        self.notifier.publish(settings);
        Ok(())
    }

    /// Read-modify-write the settings under one lock, then notify.
    pub async fn modify_settings<F>(&self, change: F) -> Result<SiteSettings, AppError>
    where
        F: FnOnce(&mut SiteSettings) -> Result<(), AppError>,
    {
        let _guard = self.locks.settings.lock().await;
        let mut settings: SiteSettings = self.store.get(keys::SETTINGS, initial_settings).await?;
        change(&mut settings)?;
        settings.validate()?;
        self.store.set(keys::SETTINGS, &settings).await?;
        tracing::info!("Site settings saved");
        self.notifier.publish(settings.clone());
        Ok(settings)
    }

    // ==================== CREDENTIAL OPERATIONS ====================

    pub async fn get_credentials(&self) -> Result<AdminCredentials, AppError> {
        let _guard = self.locks.credentials.lock().await;
        self.store.get(keys::ADMIN_CREDS, initial_credentials).await
    }

    pub async fn save_credentials(&self, credentials: AdminCredentials) -> Result<(), AppError> {
        let _guard = self.locks.credentials.lock().await;
        self.store.set(keys::ADMIN_CREDS, &credentials).await?;
        tracing::info!(username = %credentials.username, "Admin credentials updated");
        Ok(())
    }
}

// Helper functions for id-addressed collections

fn replace_record<T: Record>(items: &mut [T], record: T) -> bool {
    match items.iter_mut().find(|item| item.id() == record.id()) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

fn remove_record<T: Record>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
