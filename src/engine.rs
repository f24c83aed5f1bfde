//! The engine facade.
//!
//! [`CareEngine`] wires the pure evaluators to a repository and a clock. It
//! answers the questions the care screens ask (what is unscheduled, what is
//! due or missed today, which unit to serve next) and turns a caregiver's
//! serving into a ledger mutation.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::gaps::{GapExclusions, find_gaps};
use crate::inventory::{
    DepletionOutcome, ExpiryStatus, apply_consumption, expiry_status, fifo_candidates,
    validate_serving,
};
use crate::missed::{ServingBoard, classify_items};
use crate::models::{ConsumptionEvent, InventoryUnit, RemainingHandling, UnscheduledDate};
use crate::repository::{Clock, ItemFilter, ItemRepository, LedgerMutation, LedgerSink};
use crate::schedule::{display_schedule, next_covered};

/// A unit in a FIFO queue, flagged with its expiry urgency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FifoCandidate {
    /// The unit.
    pub unit: InventoryUnit,
    /// How close it is to expiring.
    pub expiry: ExpiryStatus,
}

/// A caregiver's report of one serving.
///
/// # Example
///
/// ```
/// use care_engine::engine::ServingRequest;
/// use care_engine::models::RemainingHandling;
/// use rust_decimal::Decimal;
///
/// let request = ServingRequest::new("item_001", Decimal::from(2), Decimal::new(5, 1))
///     .with_handling(RemainingHandling::Stored)
///     .recorded_by("staff_07");
/// assert_eq!(request.served_date, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingRequest {
    /// The unit served from.
    pub item_id: String,
    /// Date of the serving; today when absent.
    #[serde(default)]
    pub served_date: Option<NaiveDate>,
    /// Quantity put out.
    pub served_quantity: Decimal,
    /// Fraction eaten, in `[0, 1]`.
    pub consumption_rate: Decimal,
    /// What happened to the uneaten part.
    #[serde(default)]
    pub remaining_handling: Option<RemainingHandling>,
    /// Staff member recording the serving.
    #[serde(default)]
    pub recorded_by: Option<String>,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

impl ServingRequest {
    /// Creates a request served today with no handling, author or note.
    pub fn new(
        item_id: impl Into<String>,
        served_quantity: Decimal,
        consumption_rate: Decimal,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            served_date: None,
            served_quantity,
            consumption_rate,
            remaining_handling: None,
            recorded_by: None,
            note: None,
        }
    }

    /// Sets what happened to the uneaten part.
    pub fn with_handling(mut self, handling: RemainingHandling) -> Self {
        self.remaining_handling = Some(handling);
        self
    }

    /// Backdates the serving.
    pub fn on(mut self, served_date: NaiveDate) -> Self {
        self.served_date = Some(served_date);
        self
    }

    /// Sets the recording staff member.
    pub fn recorded_by(mut self, staff: impl Into<String>) -> Self {
        self.recorded_by = Some(staff.into());
        self
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Serving-schedule and FIFO depletion engine over a repository and a clock.
///
/// Read operations need only an [`ItemRepository`]; [`CareEngine::record_serving`]
/// also needs a [`LedgerSink`].
///
/// # Example
///
/// ```
/// use care_engine::config::EngineConfig;
/// use care_engine::engine::CareEngine;
/// use care_engine::gaps::GapExclusions;
/// use care_engine::repository::{FixedClock, InMemoryRepository};
/// use chrono::NaiveDate;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let engine = CareEngine::new(
///     InMemoryRepository::new(),
///     FixedClock::on(monday),
///     EngineConfig::default(),
/// );
///
/// let gaps = engine.unscheduled_dates("res_01", GapExclusions::none())?;
/// assert_eq!(gaps.len(), 14);
/// # Ok::<(), care_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CareEngine<R, C> {
    repository: R,
    clock: C,
    config: EngineConfig,
}

impl<R, C> CareEngine<R, C> {
    /// Creates an engine.
    pub fn new(repository: R, clock: C, config: EngineConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Consumes the engine, returning its repository.
    pub fn into_repository(self) -> R {
        self.repository
    }
}

impl<R: ItemRepository, C: Clock> CareEngine<R, C> {
    /// Today's date according to the engine's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Dates in the configured horizon on which nothing is scheduled for
    /// `resident_id`, skip dates excluded.
    pub fn unscheduled_dates(
        &self,
        resident_id: &str,
        exclusions: GapExclusions,
    ) -> EngineResult<Vec<UnscheduledDate>> {
        self.unscheduled_dates_within(resident_id, self.config.gaps.horizon_days, exclusions)
    }

    /// Like [`CareEngine::unscheduled_dates`] with an explicit horizon.
    pub fn unscheduled_dates_within(
        &self,
        resident_id: &str,
        horizon_days: u32,
        exclusions: GapExclusions,
    ) -> EngineResult<Vec<UnscheduledDate>> {
        let items = self
            .repository
            .list_items(&ItemFilter::resident(resident_id).active())?;
        let skip_dates: Vec<NaiveDate> = self
            .repository
            .skip_dates(resident_id)?
            .into_iter()
            .map(|skip| skip.date)
            .collect();

        Ok(find_gaps(
            &items,
            &skip_dates,
            self.today(),
            horizon_days,
            exclusions,
        ))
    }

    /// Today's serving board for `resident_id`: missed, due, served, other.
    pub fn serving_board(&self, resident_id: &str) -> EngineResult<ServingBoard> {
        let items = self
            .repository
            .list_items(&ItemFilter::resident(resident_id))?;
        let events = self.repository.consumption_events(resident_id)?;

        Ok(classify_items(
            &items,
            &events,
            self.today(),
            self.config.missed.staleness_days,
        ))
    }

    /// Active, in-stock units of `name` for `resident_id`, in FIFO order and
    /// flagged with their expiry urgency.
    pub fn fifo_queue(&self, resident_id: &str, name: &str) -> EngineResult<Vec<FifoCandidate>> {
        let items = self
            .repository
            .list_items(&ItemFilter::resident(resident_id).active())?;
        let today = self.today();

        Ok(fifo_candidates(&items, name)
            .into_iter()
            .map(|unit| {
                let expiry = expiry_status(&unit, today, self.config.expiry.expiring_soon_days);
                FifoCandidate { unit, expiry }
            })
            .collect())
    }

    /// The unit of `name` that should be served next, if any is in stock.
    pub fn recommend_unit(
        &self,
        resident_id: &str,
        name: &str,
    ) -> EngineResult<Option<FifoCandidate>> {
        let recommended = self.fifo_queue(resident_id, name)?.into_iter().next();
        if let Some(candidate) = &recommended {
            if candidate.expiry == ExpiryStatus::Expired {
                warn!(
                    resident_id = %resident_id,
                    item_id = %candidate.unit.id,
                    "Recommended unit is past its expiration date"
                );
            }
        }
        Ok(recommended)
    }

    /// The next date, from today, on which `item_id` is scheduled.
    ///
    /// # Errors
    ///
    /// [`EngineError::ItemNotFound`] if the repository has no such item.
    pub fn next_serving(&self, item_id: &str) -> EngineResult<Option<NaiveDate>> {
        let unit = self.require_item(item_id)?;
        Ok(unit.serving_schedule.as_ref().and_then(|schedule| {
            next_covered(
                schedule,
                self.today(),
                self.config.schedule.next_occurrence_horizon_days,
            )
        }))
    }

    /// The display label of `item_id`'s schedule, using the configured labels.
    ///
    /// # Errors
    ///
    /// [`EngineError::ItemNotFound`] if the repository has no such item.
    pub fn schedule_label(&self, item_id: &str) -> EngineResult<String> {
        let unit = self.require_item(item_id)?;
        Ok(display_schedule(
            unit.serving_schedule.as_ref(),
            self.today(),
            &self.config.labels,
            self.config.schedule.max_listed_dates,
        ))
    }

    fn require_item(&self, item_id: &str) -> EngineResult<InventoryUnit> {
        self.repository
            .get_item(item_id)?
            .ok_or_else(|| EngineError::ItemNotFound {
                item_id: item_id.to_string(),
            })
    }
}

impl<R: ItemRepository + LedgerSink, C: Clock> CareEngine<R, C> {
    /// Records a serving: validates it, runs the depletion ledger, and hands
    /// the resulting event and updated unit to the sink.
    ///
    /// Returns the mutation that was recorded.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ItemNotFound`] if the item does not exist
    /// - [`EngineError::InvalidServing`] / [`EngineError::ExceedsRemainingStock`]
    ///   from [`validate_serving`]
    /// - any error the sink reports
    pub fn record_serving(&mut self, request: ServingRequest) -> EngineResult<LedgerMutation> {
        let correlation_id = Uuid::new_v4();
        let start_time = Instant::now();
        debug!(
            correlation_id = %correlation_id,
            item_id = %request.item_id,
            "Recording serving"
        );

        let unit = self.require_item(&request.item_id)?;
        if let Err(err) =
            validate_serving(&unit, request.served_quantity, request.consumption_rate)
        {
            warn!(
                correlation_id = %correlation_id,
                item_id = %request.item_id,
                error = %err,
                "Serving rejected"
            );
            return Err(err);
        }

        let outcome = apply_consumption(
            &unit,
            request.served_quantity,
            request.consumption_rate,
            request.remaining_handling,
        );
        let mutation = build_mutation(&unit, outcome, request, self.clock.today(), self.clock.now());

        self.repository.record(mutation.clone())?;

        info!(
            correlation_id = %correlation_id,
            item_id = %mutation.updated_unit.id,
            event_id = %mutation.event.id,
            consumed = %mutation.outcome.consumed,
            wasted = %mutation.outcome.wasted,
            status = ?mutation.updated_unit.status,
            duration_us = start_time.elapsed().as_micros(),
            "Serving recorded"
        );

        Ok(mutation)
    }
}

fn build_mutation(
    unit: &InventoryUnit,
    outcome: DepletionOutcome,
    request: ServingRequest,
    today: NaiveDate,
    now: chrono::DateTime<chrono::Utc>,
) -> LedgerMutation {
    let event = ConsumptionEvent {
        id: Uuid::new_v4(),
        item_id: unit.id.clone(),
        served_date: request.served_date.unwrap_or(today),
        served_quantity: outcome.served,
        consumed_quantity: outcome.consumed,
        wasted_quantity: outcome.wasted,
        remaining_handling: request.remaining_handling,
        recorded_at: now,
        recorded_by: request.recorded_by,
        note: request.note,
    };

    LedgerMutation {
        event,
        updated_unit: outcome.updated_unit(unit),
        outcome,
    }
}
