//! # Dutch Auction Service
//!
//! Orchestrates one auction instance: reads the clock, runs the pure domain
//! rules, moves funds through the ledger ports and publishes events.
//!
//! ## Call discipline
//!
//! Every mutating call:
//! 1. enters the reentrancy guard
//! 2. plans under read locks, then releases them
//! 3. performs at most one ledger transfer with no lock held
//! 4. records the result under a write lock
//! 5. publishes its event
//!
//! A failure at any step returns before the state is touched.

use crate::adapters::TracingEventSink;
use crate::domain::entities::{AuctionConfig, AuctionParams, AuctionPhase, AuctionState, SettlementKind};
use crate::domain::invariants::{self, InvariantViolation};
use crate::domain::settlement::{FailureSettlement, LedgerSide, Payout, SettlementPolicy, SuccessSettlement};
use crate::domain::value_objects::{Address, DEFAULT_FINALIZE_GRACE_SECS, REQUIRED_DECIMALS};
use crate::domain::{commitments, lifecycle, pricing, AdminCap};
use crate::errors::AuctionError;
use crate::events::AuctionEvent;
use crate::guard::ReentrancyGuard;
use crate::ports::inbound::DutchAuctionApi;
use crate::ports::outbound::{AllowList, AssetLedger, Clock, EventSink};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Dutch Auction Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Seconds after `end_time` before anyone may finalize.
    pub finalize_grace_period_secs: u64,
    /// Also write every event to `tracing` as JSON.
    pub trace_events: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            finalize_grace_period_secs: DEFAULT_FINALIZE_GRACE_SECS,
            trace_events: false,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DA_FINALIZE_GRACE_SECS`: public finalize grace period (default: 604800)
    /// - `DA_TRACE_EVENTS`: mirror events into logs (default: false)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            finalize_grace_period_secs: lookup("DA_FINALIZE_GRACE_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.finalize_grace_period_secs),
            trace_events: lookup("DA_TRACE_EVENTS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.trace_events),
        }
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Call counters for one auction.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionStats {
    /// Commitments recorded with a non-zero amount.
    pub commitments_accepted: u64,
    /// Accepted commitments that were cut down to fit capacity.
    pub commitments_clamped: u64,
    /// Commitments clamped to zero (no-ops).
    pub commitments_zero: u64,
    /// Success-path claims paid.
    pub claims_paid: u64,
    /// Failure-path refunds paid (non-zero).
    pub refunds_paid: u64,
    /// Calls that returned an error.
    pub rejected_calls: u64,
    /// Rejections caused by a ledger transfer.
    pub ledger_failures: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// Collaborators of an auction instance.
pub struct AuctionPorts<L: AssetLedger, C: Clock> {
    /// Ledger of the asset being sold.
    pub auctioned: Arc<L>,
    /// Ledger of the asset participants pay with.
    pub payment: Arc<L>,
    /// Time source.
    pub clock: C,
    /// Event receiver.
    pub events: Arc<dyn EventSink>,
}

/// A single Dutch auction.
///
/// Methods take `&self`; the instance can be shared behind an `Arc`.
/// Mutating calls from different threads run one at a time.
pub struct DutchAuctionService<L: AssetLedger, C: Clock> {
    id: Uuid,
    config: ServiceConfig,
    auction: RwLock<AuctionConfig>,
    state: RwLock<AuctionState>,
    auctioned: Arc<L>,
    payment: Arc<L>,
    clock: C,
    events: Arc<dyn EventSink>,
    allow_list: RwLock<Option<Arc<dyn AllowList>>>,
    success: Arc<dyn SettlementPolicy>,
    failure: Arc<dyn SettlementPolicy>,
    guard: ReentrancyGuard,
    stats: RwLock<AuctionStats>,
}

impl<L: AssetLedger, C: Clock> DutchAuctionService<L, C> {
    /// Deploys an auction and pulls `total_supply` from the funder into custody.
    ///
    /// # Errors
    ///
    /// Any invalid parameter, an auctioned asset without 18 decimals,
    /// identical assets, or a failed funding transfer.
    #[instrument(skip(ports, config), fields(funder = %params.funder))]
    pub fn new(params: AuctionParams, ports: AuctionPorts<L, C>, config: ServiceConfig) -> Result<Self, AuctionError> {
        let AuctionPorts {
            auctioned,
            payment,
            clock,
            events,
        } = ports;
        let now = clock.now();

        invariants::validate_params(&params, now).inspect_err(|e| warn!(error = %e, "invalid auction parameters"))?;
        let decimals = auctioned.decimals();
        if decimals != REQUIRED_DECIMALS {
            return Err(AuctionError::InvalidDecimals {
                expected: REQUIRED_DECIMALS,
                actual: decimals,
            });
        }
        let auctioned_asset = auctioned.asset_id();
        let payment_asset = payment.asset_id();
        if auctioned_asset == payment_asset {
            return Err(AuctionError::IdenticalAssets(auctioned_asset));
        }

        auctioned
            .transfer_from(params.funder, params.total_supply)
            .inspect_err(|e| error!(error = %e, "funding transfer failed"))?;

        let auction = AuctionConfig::from_params(&params, auctioned_asset, payment_asset);
        let service = Self {
            id: Uuid::new_v4(),
            config,
            auction: RwLock::new(auction),
            state: RwLock::new(AuctionState::default()),
            auctioned,
            payment,
            clock,
            events,
            allow_list: RwLock::new(None),
            success: Arc::new(SuccessSettlement),
            failure: Arc::new(FailureSettlement),
            guard: ReentrancyGuard::new(),
            stats: RwLock::new(AuctionStats::default()),
        };

        info!(
            auction_id = %service.id,
            total_supply = params.total_supply,
            start_time = params.start_time,
            end_time = params.end_time,
            "auction deployed"
        );
        service.emit(AuctionEvent::AuctionDeployed {
            auction_id: service.id,
            auctioned_asset,
            payment_asset,
            total_supply: params.total_supply,
            start_time: params.start_time,
            end_time: params.end_time,
        });
        Ok(service)
    }

    /// Replaces the settlement policies.
    #[must_use]
    pub fn with_settlement_policies(
        mut self,
        success: Arc<dyn SettlementPolicy>,
        failure: Arc<dyn SettlementPolicy>,
    ) -> Self {
        self.success = success;
        self.failure = failure;
        self
    }

    /// Instance identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Service configuration.
    #[must_use]
    pub fn service_config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Current auction configuration.
    #[must_use]
    pub fn auction_config(&self) -> AuctionConfig {
        self.auction.read().clone()
    }

    /// Copy of configuration and state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> (AuctionConfig, AuctionState) {
        (self.auction.read().clone(), self.state.read().clone())
    }

    /// Current call counters.
    #[must_use]
    pub fn stats(&self) -> AuctionStats {
        self.stats.read().clone()
    }

    /// Accounting invariants violated right now. Empty when healthy.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        invariants::check_all_invariants(&self.auction.read(), &self.state.read())
    }

    // -------------------------------------------------------------------------
    // helpers
    // -------------------------------------------------------------------------

    fn ledger(&self, side: LedgerSide) -> &L {
        match side {
            LedgerSide::Auctioned => &self.auctioned,
            LedgerSide::Payment => &self.payment,
        }
    }

    fn policy(&self, kind: SettlementKind) -> Arc<dyn SettlementPolicy> {
        match kind {
            SettlementKind::Success => Arc::clone(&self.success),
            SettlementKind::Failure => Arc::clone(&self.failure),
        }
    }

    fn emit(&self, event: AuctionEvent) {
        self.events.publish(&event);
        if self.config.trace_events {
            TracingEventSink.publish(&event);
        }
    }

    fn ensure_cap(&self, cap: &AdminCap, auction: &AuctionConfig) -> Result<(), AuctionError> {
        if cap.grants(self.id, auction.administrator) {
            Ok(())
        } else {
            Err(AuctionError::InvalidCapability)
        }
    }

    fn pay(&self, payout: &Payout) -> Result<(), AuctionError> {
        if payout.is_empty() {
            return Ok(());
        }
        self.ledger(payout.side).transfer(payout.recipient, payout.amount)?;
        Ok(())
    }

    fn observe<T>(&self, operation: &'static str, result: Result<T, AuctionError>) -> Result<T, AuctionError> {
        if let Err(err) = &result {
            let mut stats = self.stats.write();
            stats.rejected_calls += 1;
            if matches!(err, AuctionError::Ledger(_)) {
                stats.ledger_failures += 1;
                error!(auction_id = %self.id, operation, error = %err, "ledger transfer failed");
            } else {
                warn!(auction_id = %self.id, operation, error = %err, "call rejected");
            }
        }
        result
    }

    // -------------------------------------------------------------------------
    // participant operations
    // -------------------------------------------------------------------------

    fn try_commit(&self, participant: Address, requested: u128) -> Result<u128, AuctionError> {
        let _scope = self.guard.enter()?;
        let now = self.clock.now();

        let (plan, allow_list_enabled) = {
            let auction = self.auction.read();
            let state = self.state.read();
            let plan = commitments::plan_commitment(&auction, &state, participant, requested, now)?;
            (plan, auction.allow_list_enabled)
        };

        if plan.is_empty() {
            self.stats.write().commitments_zero += 1;
            debug!(%participant, requested, "auction full, commitment clamped to zero");
            return Ok(0);
        }

        if allow_list_enabled {
            let list = self.allow_list.read().clone();
            let allowed = list.is_some_and(|l| l.is_allowed(participant, plan.cumulative));
            if !allowed {
                return Err(AuctionError::NotAllowListed {
                    participant,
                    cumulative: plan.cumulative,
                });
            }
        }

        self.payment.transfer_from(participant, plan.amount)?;
        commitments::apply_commitment(&mut self.state.write(), &plan)?;

        {
            let mut stats = self.stats.write();
            stats.commitments_accepted += 1;
            if plan.was_clamped() {
                stats.commitments_clamped += 1;
            }
        }
        if plan.was_clamped() {
            debug!(%participant, requested, accepted = plan.amount, "commitment clamped to capacity");
        }
        info!(%participant, amount = plan.amount, cumulative = plan.cumulative, "commitment added");
        self.emit(AuctionEvent::CommitmentAdded {
            participant,
            amount: plan.amount,
        });
        Ok(plan.amount)
    }

    fn try_withdraw(&self, participant: Address) -> Result<u128, AuctionError> {
        let _scope = self.guard.enter()?;

        let policy = self.policy(lifecycle::settled_kind(&self.state.read())?);
        let custody = self.ledger(policy.withdrawal_side()).custody_balance();
        let payout = {
            let auction = self.auction.read();
            let state = self.state.read();
            policy.plan_withdrawal(&auction, &state, participant, custody)?
        };

        self.pay(&payout)?;
        policy.apply_withdrawal(&mut self.state.write(), &payout)?;

        match policy.kind() {
            SettlementKind::Success => {
                self.stats.write().claims_paid += 1;
                info!(%participant, amount = payout.amount, "tokens claimed");
                self.emit(AuctionEvent::TokensClaimed {
                    participant,
                    amount: payout.amount,
                });
            }
            SettlementKind::Failure if payout.is_empty() => {
                debug!(%participant, "nothing left to refund");
            }
            SettlementKind::Failure => {
                self.stats.write().refunds_paid += 1;
                info!(%participant, amount = payout.amount, "commitment refunded");
                self.emit(AuctionEvent::CommitmentRefunded {
                    participant,
                    amount: payout.amount,
                });
            }
        }
        Ok(payout.amount)
    }

    // -------------------------------------------------------------------------
    // lifecycle operations
    // -------------------------------------------------------------------------

    fn try_authorize(&self, caller: Address) -> Result<AdminCap, AuctionError> {
        if caller != self.auction.read().administrator {
            return Err(AuctionError::Unauthorized(caller));
        }
        Ok(AdminCap::issue(caller, self.id))
    }

    fn try_cancel(&self, cap: &AdminCap) -> Result<(), AuctionError> {
        let _scope = self.guard.enter()?;
        let payout = {
            let auction = self.auction.read();
            let state = self.state.read();
            self.ensure_cap(cap, &auction)?;
            let kind = lifecycle::decide_cancel(&state)?;
            self.policy(kind).terminal_payout(&auction, &state)
        };

        self.pay(&payout)?;
        self.state.write().settle(SettlementKind::Failure);

        info!(treasury = %payout.recipient, returned = payout.amount, "auction cancelled");
        self.emit(AuctionEvent::AuctionCancelled);
        Ok(())
    }

    fn try_finalize(&self, cap: Option<&AdminCap>) -> Result<SettlementKind, AuctionError> {
        let _scope = self.guard.enter()?;
        let now = self.clock.now();
        let (kind, payout) = {
            let auction = self.auction.read();
            let state = self.state.read();
            let is_admin = match cap {
                Some(cap) => {
                    self.ensure_cap(cap, &auction)?;
                    true
                }
                None => false,
            };
            let kind = lifecycle::decide_finalize(
                &auction,
                &state,
                now,
                is_admin,
                self.config.finalize_grace_period_secs,
            )?;
            (kind, self.policy(kind).terminal_payout(&auction, &state))
        };

        self.pay(&payout)?;
        self.state.write().settle(kind);

        info!(outcome = ?kind, treasury = %payout.recipient, amount = payout.amount, "auction finalized");
        self.emit(AuctionEvent::AuctionFinalized { outcome: kind });
        Ok(kind)
    }

    // -------------------------------------------------------------------------
    // administration
    // -------------------------------------------------------------------------

    fn try_set_schedule(&self, cap: &AdminCap, start_time: u64, end_time: u64) -> Result<(), AuctionError> {
        let _scope = self.guard.enter()?;
        let now = self.clock.now();
        {
            let mut auction = self.auction.write();
            self.ensure_cap(cap, &auction)?;
            invariants::invariant_no_commitments(&self.state.read())?;
            invariants::invariant_valid_schedule(start_time, end_time, now)?;
            auction.start_time = start_time;
            auction.end_time = end_time;
        }
        info!(start_time, end_time, "schedule updated");
        self.emit(AuctionEvent::ScheduleUpdated { start_time, end_time });
        Ok(())
    }

    fn try_set_prices(&self, cap: &AdminCap, start_price: u128, floor_price: u128) -> Result<(), AuctionError> {
        let _scope = self.guard.enter()?;
        {
            let mut auction = self.auction.write();
            self.ensure_cap(cap, &auction)?;
            invariants::invariant_no_commitments(&self.state.read())?;
            invariants::invariant_valid_prices(start_price, floor_price)?;
            auction.start_price = start_price;
            auction.floor_price = floor_price;
        }
        info!(start_price, floor_price, "prices updated");
        self.emit(AuctionEvent::PricesUpdated {
            start_price,
            floor_price,
        });
        Ok(())
    }

    fn try_set_treasury(&self, cap: &AdminCap, treasury: Address) -> Result<(), AuctionError> {
        let _scope = self.guard.enter()?;
        {
            let mut auction = self.auction.write();
            self.ensure_cap(cap, &auction)?;
            invariants::invariant_non_zero(treasury, "treasury")?;
            auction.treasury = treasury;
        }
        info!(%treasury, "treasury updated");
        self.emit(AuctionEvent::TreasuryUpdated { treasury });
        Ok(())
    }

    fn try_transfer_administrator(&self, cap: &AdminCap, new_admin: Address) -> Result<(), AuctionError> {
        let _scope = self.guard.enter()?;
        let previous = {
            let mut auction = self.auction.write();
            self.ensure_cap(cap, &auction)?;
            invariants::invariant_non_zero(new_admin, "administrator")?;
            std::mem::replace(&mut auction.administrator, new_admin)
        };
        info!(%previous, new = %new_admin, "administrator transferred");
        self.emit(AuctionEvent::AdministratorTransferred {
            previous,
            new: new_admin,
        });
        Ok(())
    }

    fn try_set_allow_list(&self, cap: &AdminCap, list: Option<Arc<dyn AllowList>>, enabled: bool) -> Result<(), AuctionError> {
        let _scope = self.guard.enter()?;
        {
            let mut auction = self.auction.write();
            self.ensure_cap(cap, &auction)?;
            if self.state.read().finalized {
                return Err(AuctionError::AlreadyFinalized);
            }
            if let Some(list) = list {
                *self.allow_list.write() = Some(list);
            }
            auction.allow_list_enabled = enabled;
        }
        info!(enabled, "allow-list updated");
        self.emit(AuctionEvent::AllowListUpdated { enabled });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // views
    // -------------------------------------------------------------------------

    fn view<T>(&self, f: impl FnOnce(&AuctionConfig, &AuctionState, u64) -> T) -> T {
        let now = self.clock.now();
        let auction = self.auction.read();
        let state = self.state.read();
        f(&*auction, &*state, now)
    }
}

impl<L: AssetLedger, C: Clock> DutchAuctionApi for DutchAuctionService<L, C> {
    #[instrument(skip(self), fields(auction_id = %self.id))]
    fn commit(&self, participant: Address, amount: u128) -> Result<u128, AuctionError> {
        let result = self.try_commit(participant, amount);
        self.observe("commit", result)
    }

    #[instrument(skip(self), fields(auction_id = %self.id))]
    fn withdraw(&self, participant: Address) -> Result<u128, AuctionError> {
        let result = self.try_withdraw(participant);
        self.observe("withdraw", result)
    }

    #[instrument(skip(self), fields(auction_id = %self.id))]
    fn authorize(&self, caller: Address) -> Result<AdminCap, AuctionError> {
        let result = self.try_authorize(caller);
        self.observe("authorize", result)
    }

    #[instrument(skip(self, cap), fields(auction_id = %self.id))]
    fn cancel(&self, cap: &AdminCap) -> Result<(), AuctionError> {
        let result = self.try_cancel(cap);
        self.observe("cancel", result)
    }

    #[instrument(skip(self, cap), fields(auction_id = %self.id, public = cap.is_none()))]
    fn finalize(&self, cap: Option<&AdminCap>) -> Result<SettlementKind, AuctionError> {
        let result = self.try_finalize(cap);
        self.observe("finalize", result)
    }

    #[instrument(skip(self, cap), fields(auction_id = %self.id))]
    fn set_schedule(&self, cap: &AdminCap, start_time: u64, end_time: u64) -> Result<(), AuctionError> {
        let result = self.try_set_schedule(cap, start_time, end_time);
        self.observe("set_schedule", result)
    }

    #[instrument(skip(self, cap), fields(auction_id = %self.id))]
    fn set_prices(&self, cap: &AdminCap, start_price: u128, floor_price: u128) -> Result<(), AuctionError> {
        let result = self.try_set_prices(cap, start_price, floor_price);
        self.observe("set_prices", result)
    }

    #[instrument(skip(self, cap), fields(auction_id = %self.id))]
    fn set_treasury(&self, cap: &AdminCap, treasury: Address) -> Result<(), AuctionError> {
        let result = self.try_set_treasury(cap, treasury);
        self.observe("set_treasury", result)
    }

    #[instrument(skip(self, cap), fields(auction_id = %self.id))]
    fn transfer_administrator(&self, cap: &AdminCap, new_admin: Address) -> Result<(), AuctionError> {
        let result = self.try_transfer_administrator(cap, new_admin);
        self.observe("transfer_administrator", result)
    }

    #[instrument(skip(self, cap, list), fields(auction_id = %self.id))]
    fn set_allow_list(&self, cap: &AdminCap, list: Arc<dyn AllowList>) -> Result<(), AuctionError> {
        let result = self.try_set_allow_list(cap, Some(list), true);
        self.observe("set_allow_list", result)
    }

    #[instrument(skip(self, cap), fields(auction_id = %self.id))]
    fn enable_allow_list(&self, cap: &AdminCap, enabled: bool) -> Result<(), AuctionError> {
        let result = self.try_set_allow_list(cap, None, enabled);
        self.observe("enable_allow_list", result)
    }

    fn clearing_price(&self) -> u128 {
        self.view(pricing::clearing_price)
    }

    fn decay_price(&self) -> u128 {
        self.view(|auction, _, now| pricing::decay_price(auction, now))
    }

    fn demand_price(&self) -> u128 {
        self.view(|auction, state, _| pricing::demand_price(auction, state))
    }

    fn price_drop_rate(&self) -> u128 {
        pricing::price_drop_rate(&self.auction.read())
    }

    fn is_open(&self) -> bool {
        self.view(lifecycle::is_open)
    }

    fn has_ended(&self) -> bool {
        self.view(lifecycle::has_ended)
    }

    fn auction_succeeded(&self) -> bool {
        self.view(pricing::auction_succeeded)
    }

    fn claimable_amount(&self, participant: Address) -> u128 {
        let custody = self.auctioned.custody_balance();
        commitments::claimable_amount(&self.auction.read(), &self.state.read(), &participant, custody)
    }

    fn commitments_total(&self) -> u128 {
        self.state.read().commitments_total
    }

    fn commitment_of(&self, participant: Address) -> u128 {
        self.state.read().commitment_of(&participant)
    }

    fn claimed_of(&self, participant: Address) -> u128 {
        self.state.read().claimed_of(&participant)
    }

    fn tokens_committed(&self) -> u128 {
        self.view(pricing::tokens_committed)
    }

    fn phase(&self) -> AuctionPhase {
        self.view(lifecycle::phase)
    }

    fn is_finalized(&self) -> bool {
        self.state.read().finalized
    }

    fn finalize_deadline(&self) -> u64 {
        lifecycle::finalize_deadline(&self.auction.read(), self.config.finalize_grace_period_secs)
    }
}

// =============================================================================
// TESTS
// =============================================================================
