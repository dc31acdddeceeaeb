//! Collection state manager for the objects API.
//!
//! # Design
//! The list endpoint only returns the reserved, server-seeded objects; objects
//! created by this client never show up there. The store therefore keeps its
//! own creation history (`user_created`, most recent first) and prepends it to
//! every fetched list to form `all_records`. Pagination is computed locally
//! over that merged list.
//!
//! All state lives in a `watch` channel. Views call `subscribe()` and re-render
//! whenever the state changes. Operations take `&self`; the phase flags in
//! `Phases` are advisory and nothing prevents two operations of the same kind
//! from overlapping. Callers are expected to disable their triggers while a
//! flag is set.
//!
//! Deletes are optimistic: the record disappears before the server answers
//! and is put back at its original position if the request fails.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ObjectsApi;
use crate::client::ObjectClient;
use crate::config::ClientConfig;
use crate::error::StoreError;
use crate::page::{total_pages, PageWindow};
use crate::transport::Transport;
use crate::types::{is_reserved_id, Record};

/// In-flight markers, one per kind of operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phases {
    pub loading: bool,
    pub creating: bool,
    pub updating: bool,
    pub deleting: bool,
    pub selecting: bool,
}

/// Everything a view needs to render the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState {
    /// `user_created` followed by the reserved records of the last fetch.
    pub all_records: Vec<Record>,
    /// The current page of `all_records`.
    pub visible_records: Vec<Record>,
    /// Records created by this client, most recent first.
    pub user_created: Vec<Record>,
    /// 1-based page cursor.
    pub page: usize,
    pub page_size: usize,
    pub total_objects: usize,
    pub total_pages: usize,
    pub has_more: bool,
    pub selected: Option<Record>,
    pub phases: Phases,
    /// User-facing message for the last failed collection operation.
    pub error: Option<String>,
    /// User-facing message for the last failed `select`.
    pub selection_error: Option<String>,
}

impl CollectionState {
    pub fn new(page_size: usize) -> Self {
        Self {
            all_records: Vec::new(),
            visible_records: Vec::new(),
            user_created: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            total_objects: 0,
            total_pages: 0,
            has_more: false,
            selected: None,
            phases: Phases::default(),
            error: None,
            selection_error: None,
        }
    }

    /// Rebuild `all_records` from the locally created records and a freshly
    /// fetched list. A fetched record that shares an id with a local one is
    /// dropped so each id appears once.
    fn merge_fetched(&mut self, fetched: Vec<Record>) {
        let mut merged = self.user_created.clone();
        merged.extend(fetched.into_iter().filter(|record| {
            record.id.as_deref().map_or(true, |id| {
                !self.user_created.iter().any(|own| own.id.as_deref() == Some(id))
            })
        }));
        self.all_records = merged;
        self.recompute_window();
    }

    fn recompute_window(&mut self) {
        let len = self.all_records.len();
        self.total_objects = len;
        self.total_pages = total_pages(len, self.page_size);
        let window = PageWindow::compute(len, self.page, self.page_size);
        self.has_more = window.has_more;
        self.visible_records = self.all_records[window.range].to_vec();
    }

    /// Keep the cursor on an existing page after the list shrinks.
    fn clamp_page(&mut self) {
        let pages = total_pages(self.all_records.len(), self.page_size);
        self.page = self.page.min(pages).max(1);
    }

    fn replace_record(&mut self, id: &str, updated: &Record) {
        for record in self
            .user_created
            .iter_mut()
            .chain(self.all_records.iter_mut())
            .filter(|r| r.id.as_deref() == Some(id))
        {
            *record = updated.clone();
        }
        if self.selected.as_ref().is_some_and(|r| r.id.as_deref() == Some(id)) {
            self.selected = Some(updated.clone());
        }
        self.recompute_window();
    }

    /// Remove a record from every list it appears in, remembering where it
    /// was. Returns `None` when the id is not in `all_records`.
    fn take_record(&mut self, id: &str) -> Option<Removal> {
        let matches = |record: &Record| record.id.as_deref() == Some(id);
        let merged_index = self.all_records.iter().position(matches)?;
        let record = self.all_records.remove(merged_index);
        let user_index = self.user_created.iter().position(matches);
        if let Some(index) = user_index {
            self.user_created.remove(index);
        }
        let selection = if self.selected.as_ref().is_some_and(matches) {
            self.selected.take()
        } else {
            None
        };
        let page = self.page;
        self.clamp_page();
        self.recompute_window();
        Some(Removal {
            record,
            merged_index,
            user_index,
            selection,
            page,
        })
    }
}

/// Undo information for an optimistic delete.
#[derive(Debug)]
struct Removal {
    record: Record,
    merged_index: usize,
    user_index: Option<usize>,
    selection: Option<Record>,
    page: usize,
}

impl Removal {
    fn revert(self, state: &mut CollectionState) {
        let merged_index = self.merged_index.min(state.all_records.len());
        state.all_records.insert(merged_index, self.record.clone());
        if let Some(index) = self.user_index {
            let index = index.min(state.user_created.len());
            state.user_created.insert(index, self.record);
        }
        if state.selected.is_none() {
            state.selected = self.selection;
        }
        state.page = self.page;
        state.recompute_window();
    }
}

fn validate(record: &Record) -> Result<(), StoreError> {
    if record.name.trim().is_empty() {
        return Err(StoreError::InvalidRecord("Name is required.".to_string()));
    }
    Ok(())
}

fn reject_reserved(id: &str) -> Result<(), StoreError> {
    if is_reserved_id(id) {
        warn!(id, "refusing to modify reserved object");
        return Err(StoreError::PolicyViolation { id: id.to_string() });
    }
    Ok(())
}

pub struct CollectionStore<T> {
    api: ObjectsApi<T>,
    state: watch::Sender<CollectionState>,
}

impl<T: Transport> CollectionStore<T> {
    pub fn new(api: ObjectsApi<T>, page_size: usize) -> Self {
        let (state, _) = watch::channel(CollectionState::new(page_size));
        Self { api, state }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        let api = ObjectsApi::new(ObjectClient::new(&config.base_url), transport);
        Self::new(api, config.page_size)
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CollectionState {
        self.state.borrow().clone()
    }

    fn modify(&self, f: impl FnOnce(&mut CollectionState)) {
        self.state.send_modify(f);
    }

    /// Fetch the reserved records and rebuild the merged list, showing the
    /// loading phase.
    pub async fn fetch_all(&self) -> Result<(), StoreError> {
        self.fetch(true).await
    }

    /// Same as `fetch_all` without toggling `phases.loading`.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        self.fetch(false).await
    }

    async fn fetch(&self, show_loading: bool) -> Result<(), StoreError> {
        let mut previous = Vec::new();
        let mut previous_page = 1;
        self.modify(|s| {
            if show_loading {
                s.phases.loading = true;
            }
            s.error = None;
            previous_page = std::mem::replace(&mut s.page, 1);
            previous = std::mem::take(&mut s.all_records);
        });

        let outcome = match self.api.list_all().await {
            Ok(records) => {
                self.modify(|s| {
                    debug!(fetched = records.len(), local = s.user_created.len(), "merging records");
                    s.merge_fetched(records);
                });
                Ok(())
            }
            Err(err) => {
                // Put the last good list back, with any record created since
                // it was taken merged in front.
                self.modify(|s| {
                    s.page = previous_page;
                    s.merge_fetched(previous);
                    s.clamp_page();
                    s.recompute_window();
                    s.error = Some(err.user_message());
                });
                Err(err.into())
            }
        };

        if show_loading {
            self.modify(|s| s.phases.loading = false);
        }
        outcome
    }

    /// Advance to the next page. Returns `false` when already at the last
    /// page. Paging is a single state update, so two calls never overlap.
    pub fn load_more(&self) -> bool {
        self.state.send_if_modified(|s| {
            if s.page >= s.total_pages {
                return false;
            }
            s.page += 1;
            s.recompute_window();
            true
        })
    }

    /// Jump to page `page`. Out-of-range pages are ignored.
    pub fn go_to_page(&self, page: usize) -> bool {
        self.state.send_if_modified(|s| {
            if page < 1 || page > s.total_pages || page == s.page {
                return false;
            }
            s.page = page;
            s.recompute_window();
            true
        })
    }

    /// Change the window size and return to the first page. Zero and the
    /// current size are ignored.
    pub fn change_page_size(&self, page_size: usize) -> bool {
        self.state.send_if_modified(|s| {
            if page_size == 0 || page_size == s.page_size {
                return false;
            }
            s.page_size = page_size;
            s.page = 1;
            s.recompute_window();
            true
        })
    }

    /// Create a record and refresh the merged list. The server's copy,
    /// carrying the assigned id, is returned and becomes the newest
    /// user-created record.
    pub async fn create(&self, record: Record) -> Result<Record, StoreError> {
        validate(&record)?;
        self.modify(|s| s.phases.creating = true);

        let outcome = match self.api.create(&record).await {
            Ok(created) => {
                info!(id = ?created.id, name = %created.name, "object created");
                self.modify(|s| s.user_created.insert(0, created.clone()));
                if let Err(err) = self.refresh().await {
                    warn!(error = %err, "refresh after create failed");
                }
                Ok(created)
            }
            Err(err) => {
                self.modify(|s| s.error = Some(err.user_message()));
                Err(err.into())
            }
        };

        self.modify(|s| s.phases.creating = false);
        outcome
    }

    /// Replace a user-created record. Reserved ids are rejected without a
    /// request.
    pub async fn update(&self, id: &str, record: Record) -> Result<Record, StoreError> {
        reject_reserved(id)?;
        validate(&record)?;
        self.modify(|s| s.phases.updating = true);

        let outcome = match self.api.update(id, &record).await {
            Ok(mut updated) => {
                if updated.id.is_none() {
                    updated.id = Some(id.to_string());
                }
                info!(id, "object updated");
                self.modify(|s| s.replace_record(id, &updated));
                Ok(updated)
            }
            Err(err) => {
                self.modify(|s| s.error = Some(err.user_message()));
                Err(err.into())
            }
        };

        self.modify(|s| s.phases.updating = false);
        outcome
    }

    /// Delete a user-created record, removing it locally first. On failure
    /// it is restored at its previous position.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        reject_reserved(id)?;

        let mut removal = None;
        self.modify(|s| {
            removal = s.take_record(id);
            if removal.is_some() {
                s.phases.deleting = true;
            } else {
                s.error = Some(StoreError::MissingRecord { id: id.to_string() }.user_message());
            }
        });
        let Some(removal) = removal else {
            warn!(id, "delete of object missing from the collection");
            return Err(StoreError::MissingRecord { id: id.to_string() });
        };

        let result = self.api.delete(id).await;

        let mut outcome = Ok(());
        self.modify(|s| {
            match result {
                Ok(()) => info!(id, "object deleted"),
                Err(err) => {
                    warn!(id, error = %err, "delete failed, restoring object");
                    removal.revert(s);
                    s.error = Some(err.user_message());
                    outcome = Err(err.into());
                }
            }
            s.phases.deleting = false;
        });
        outcome
    }

    /// Fetch one record and make it the selection.
    pub async fn select(&self, id: &str) -> Result<Record, StoreError> {
        self.modify(|s| {
            s.phases.selecting = true;
            s.selection_error = None;
        });

        let outcome = self.api.get_by_id(id).await.map_err(StoreError::from);

        self.modify(|s| {
            match &outcome {
                Ok(record) => s.selected = Some(record.clone()),
                Err(err) => s.selection_error = Some(err.user_message()),
            }
            s.phases.selecting = false;
        });
        outcome
    }

    /// Select a record that is already in hand, without a request.
    pub fn set_selected(&self, record: Record) {
        self.modify(|s| s.selected = Some(record));
    }

    pub fn clear_selection(&self) {
        self.state.send_if_modified(|s| s.selected.take().is_some());
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }
}
