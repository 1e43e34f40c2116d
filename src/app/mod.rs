//! Application shell - turns UI events into controller calls and markup.
//!
//! The shell owns what the browser would: the current route, the rendered
//! root element, the receipt file input and raised alerts. Controllers decide,
//! the shell carries out their [`Effect`]s. Store calls go through the
//! [`worker`] and come back as events applied by [`App::settle`] or
//! [`App::poll`].

/// Serial store worker and its request/event types
pub mod worker;

use crate::config::FormConfig;
use crate::core::draft::FormField;
use crate::core::presenter::{BillsListState, BillsPage};
use crate::core::route::{self, NavIcon, Route};
use crate::core::session::{SessionStorage, current_session};
use crate::core::submission::{Effect, NewBillController, SubmissionState};
use crate::core::upload::SelectedFile;
use crate::errors::{Error, Result};
use crate::store::BillStore;
use crate::views;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::{debug, info, instrument};
use worker::{StoreEvent, StoreRequest};

/// Employee-facing application state and its rendered markup.
///
/// Every entry point mirrors a user action. After one, [`root`](Self::root)
/// holds the markup to display.
pub struct App {
    session: Arc<dyn SessionStorage>,
    form_config: FormConfig,
    requests: UnboundedSender<StoreRequest>,
    events: UnboundedReceiver<StoreEvent>,
    in_flight: usize,
    route: Route,
    bills: BillsListState,
    list_ticket: u64,
    /// Owner whose bills the current list shows; `None` shows all
    list_email: Option<String>,
    /// Create failure raised away from the bills list, shown on the next visit
    deferred_error: Option<String>,
    form: Option<NewBillController>,
    form_id: u64,
    /// Controllers whose create is outstanding, oldest first
    submitted: VecDeque<NewBillController>,
    receipt: Option<String>,
    file_input: Option<String>,
    alerts: Vec<String>,
    root: String,
}

impl App {
    /// Builds the shell and spawns its store worker.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(
        store: Arc<dyn BillStore>,
        session: Arc<dyn SessionStorage>,
        form_config: FormConfig,
    ) -> Self {
        let (requests, events) = worker::spawn(store);
        let mut app = Self {
            session,
            form_config,
            requests,
            events,
            in_flight: 0,
            route: Route::Login,
            bills: BillsListState::default(),
            list_ticket: 0,
            list_email: None,
            deferred_error: None,
            form: None,
            form_id: 0,
            submitted: VecDeque::new(),
            receipt: None,
            file_input: None,
            alerts: Vec::new(),
            root: String::new(),
        };
        app.render();
        app
    }

    /// Markup of the root element
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Route currently displayed
    #[must_use]
    pub const fn route(&self) -> Route {
        self.route
    }

    /// Navigation icon currently lit, if any
    #[must_use]
    pub fn active_icon(&self) -> Option<NavIcon> {
        route::highlight(self.route.path())
    }

    /// Alerts raised so far, oldest first
    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Drains the raised alerts, as if the user dismissed them.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Name of the file currently held by the receipt input
    #[must_use]
    pub fn file_input(&self) -> Option<&str> {
        self.file_input.as_deref()
    }

    /// State of the form on screen, if the new-bill page is shown
    #[must_use]
    pub fn form_state(&self) -> Option<SubmissionState> {
        self.form.as_ref().map(NewBillController::state)
    }

    /// Store calls queued and not yet applied
    #[must_use]
    pub const fn pending_requests(&self) -> usize {
        self.in_flight
    }

    /// Resolves `path` against the session and shows the resulting view.
    ///
    /// Leaving the new-bill page discards its draft. The bills list starts in
    /// its loading state and queues a fetch.
    ///
    /// # Errors
    /// `WorkerStopped` if the list fetch cannot be queued.
    #[instrument(skip(self))]
    pub fn navigate(&mut self, path: &str) -> Result<()> {
        let session = current_session(self.session.as_ref());
        let route = route::resolve(path, session.as_ref());
        info!(?route, "navigate");

        self.route = route;
        self.receipt = None;
        self.file_input = None;
        self.form = None;

        match route {
            Route::Login => {}
            Route::Bills => {
                self.list_ticket += 1;
                self.list_email = session.as_ref().and_then(|session| session.email.clone());
                self.bills = BillsListState::loading();
                if let Some(message) = self.deferred_error.take() {
                    self.bills.failed(message);
                }
                self.send(StoreRequest::List {
                    ticket: self.list_ticket,
                })?;
            }
            Route::NewBill => {
                if let Some(session) = &session {
                    self.form_id += 1;
                    self.form = Some(NewBillController::new(session, self.form_config.clone()));
                }
            }
        }

        self.render();
        Ok(())
    }

    /// Click on a navigation icon
    pub fn click_nav(&mut self, icon: NavIcon) -> Result<()> {
        self.navigate(icon.target().path())
    }

    /// Click on "Nouvelle note de frais"
    pub fn click_new_bill(&mut self) -> Result<()> {
        self.navigate(Route::NEW_BILL_PATH)
    }

    /// Typing in a form field. Ignored outside the new-bill page.
    pub fn change_field(&mut self, field: FormField, value: impl Into<String>) {
        if let Some(form) = self.form.as_mut() {
            form.change_field(field, value);
        }
    }

    /// Picking a receipt in the file input.
    ///
    /// An accepted file is uploaded in the background; a rejected one clears
    /// the input and raises an alert.
    ///
    /// # Errors
    /// `WorkerStopped` if the upload cannot be queued.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<()> {
        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        self.file_input = Some(file.name.clone());
        let effects = form.select_file(file);
        self.apply(effects)?;
        self.render();
        Ok(())
    }

    /// Submit action of the new-bill form.
    ///
    /// Returns once the create is queued and the bills list is shown; the
    /// create outcome arrives later through [`settle`](Self::settle).
    ///
    /// # Errors
    /// `WorkerStopped` if the create or the list fetch cannot be queued.
    pub fn submit(&mut self) -> Result<()> {
        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        let effects = form.submit();
        if form.state() == SubmissionState::Submitting {
            if let Some(submitted) = self.form.take() {
                self.submitted.push_back(submitted);
            }
        }
        self.apply(effects)?;
        self.render();
        Ok(())
    }

    /// Click on the eye icon of the `index`-th displayed bill.
    ///
    /// Returns whether a receipt modal was opened.
    pub fn click_receipt(&mut self, index: usize) -> bool {
        if self.route != Route::Bills {
            return false;
        }
        let BillsPage::List(rows) = self.bills.page() else {
            return false;
        };
        let Some(url) = rows.get(index).and_then(|row| row.file_url.clone()) else {
            return false;
        };
        debug!(index, "opening receipt");
        self.receipt = Some(url);
        self.render();
        true
    }

    /// Closes the receipt modal, if open.
    pub fn close_receipt(&mut self) {
        if self.receipt.take().is_some() {
            self.render();
        }
    }

    /// Applies every store event that has already arrived, without waiting.
    ///
    /// # Errors
    /// `WorkerStopped` if the worker has gone away.
    pub fn poll(&mut self) -> Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.receive(event)?,
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => return Err(Error::WorkerStopped),
            }
        }
    }

    /// Waits for all queued store calls and applies their results in order.
    ///
    /// # Errors
    /// `WorkerStopped` if the worker stops before answering.
    pub async fn settle(&mut self) -> Result<()> {
        while self.in_flight > 0 {
            let event = self.events.recv().await.ok_or(Error::WorkerStopped)?;
            self.receive(event)?;
        }
        Ok(())
    }

    fn send(&mut self, request: StoreRequest) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|_| Error::WorkerStopped)?;
        self.in_flight += 1;
        Ok(())
    }

    fn receive(&mut self, event: StoreEvent) -> Result<()> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            StoreEvent::Listed { ticket, result } => {
                if self.route != Route::Bills || ticket != self.list_ticket {
                    debug!(ticket, "dropping list result for a page no longer shown");
                    return Ok(());
                }
                match result {
                    Ok(mut bills) => {
                        if let Some(email) = &self.list_email {
                            bills.retain(|bill| &bill.email == email);
                        }
                        self.bills.loaded(bills);
                    }
                    Err(message) => self.bills.failed(message),
                }
            }
            StoreEvent::Created(result) => {
                let controller = self.submitted.pop_front();
                let effects = match (result, controller) {
                    (Ok(bill), Some(mut controller)) => {
                        info!(id = bill.id, "bill created");
                        controller.create_succeeded();
                        Vec::new()
                    }
                    (Ok(bill), None) => {
                        info!(id = bill.id, "bill created");
                        Vec::new()
                    }
                    (Err(message), Some(mut controller)) => controller.create_failed(&message),
                    (Err(message), None) => vec![Effect::ShowListError(message)],
                };
                self.apply(effects)?;
            }
            StoreEvent::Uploaded {
                form,
                file_name,
                result,
            } => {
                let Some(controller) = self.form.as_mut().filter(|_| form == self.form_id) else {
                    debug!(file_name, "dropping upload result for a closed form");
                    return Ok(());
                };
                let effects = match result {
                    Ok(url) => {
                        controller.upload_resolved(&file_name, url);
                        Vec::new()
                    }
                    Err(message) => controller.upload_failed(&file_name, &message),
                };
                self.apply(effects)?;
            }
        }

        self.render();
        Ok(())
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Alert(message) => {
                    info!(%message, "alert");
                    self.alerts.push(message);
                }
                Effect::ClearFileInput => self.file_input = None,
                Effect::UploadReceipt(receipt) => self.send(StoreRequest::Upload {
                    form: self.form_id,
                    receipt,
                })?,
                Effect::CreateBill(bill) => self.send(StoreRequest::Create(bill))?,
                Effect::Navigate(route) => self.navigate(route.path())?,
                Effect::ShowListError(message) => {
                    if self.route == Route::Bills {
                        self.bills.failed(message);
                    } else {
                        // the page on screen stays; the list shows it next time
                        info!(%message, "create failed away from the bills list");
                        self.alerts.push(message.clone());
                        self.deferred_error = Some(message);
                    }
                }
            }
        }
        Ok(())
    }

    fn render(&mut self) {
        let icon = self.active_icon();
        self.root = match self.route {
            Route::Login => views::login::render(),
            Route::Bills => views::layout::page(
                icon,
                &views::bills::render(&self.bills.page(), self.receipt.as_deref()),
            ),
            Route::NewBill => {
                let form = self
                    .form
                    .as_ref()
                    .map(|form| views::new_bill::render(form.draft(), form.errors()))
                    .unwrap_or_default();
                views::layout::page(icon, &form)
            }
        };
    }
}
