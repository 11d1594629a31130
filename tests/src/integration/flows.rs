//! # End-to-End Auction Flows
//!
//! Drives a deployed auction through complete lifecycles against the
//! in-memory ledgers and checks balances, views and the event stream.
//!
//! ## Flows Tested:
//!
//! 1. **Success**: commitments fill capacity, admin finalizes early, claims paid
//! 2. **Failure**: reserve not met, refunds returned in full
//! 3. **Cancel**: admin aborts before any commitment
//! 4. **Administration**: handover, setters, allow-list gating

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use auction_telemetry::{log_auction_event, log_participant_event};
    use dutch_auction::prelude::*;
    use dutch_auction::{ErrorCategory, InMemoryAllowList};

    use crate::harness::*;

    fn alice() -> Address {
        participant(1)
    }

    fn bob() -> Address {
        participant(2)
    }

    // =============================================================================
    // SUCCESS PATH
    // =============================================================================

    #[test]
    fn test_success_path_end_to_end() {
        let h = AuctionHarness::deploy(2, ServiceConfig::default()).unwrap();
        let auction = &h.service;

        // Halfway through the window the price is 1.5, capacity 1500.
        h.at(WINDOW / 2);
        assert_eq!(auction.decay_price(), 3 * E18 / 2);
        assert_eq!(auction.commit(alice(), 1_000 * E18), Ok(1_000 * E18));
        assert_eq!(auction.commit(bob(), 1_000 * E18), Ok(500 * E18));
        log_participant_event!(info, auction.id(), "commitment_added", bob(), "clamped to capacity");

        assert!(auction.auction_succeeded());
        assert!(auction.has_ended());
        assert_eq!(auction.tokens_committed(), SUPPLY);
        assert_eq!(h.payment.balance_of(bob()), BUDGET - 500 * E18);

        let cap = h.admin().unwrap();
        assert_eq!(auction.finalize(Some(&cap)), Ok(SettlementKind::Success));
        log_auction_event!(info, auction.id(), "auction_finalized", "settled early");
        assert_eq!(h.payment.balance_of(TREASURY), 1_500 * E18);
        assert_eq!(h.payment.custody_balance(), 0);

        h.at(WINDOW + 10);
        assert_eq!(auction.claimable_amount(alice()), 666_666_666_666_666_666_666);
        assert_eq!(auction.withdraw(alice()), Ok(666_666_666_666_666_666_666));
        assert_eq!(auction.withdraw(bob()), Ok(333_333_333_333_333_333_333));
        assert_eq!(auction.withdraw(alice()), Err(AuctionError::NothingToClaim(alice())));

        // Truncation leaves one unit in custody.
        assert_eq!(h.auctioned.custody_balance(), 1);
        assert_eq!(h.auctioned.balance_of(alice()), 666_666_666_666_666_666_666);
        assert_eq!(auction.claimed_of(bob()), 333_333_333_333_333_333_333);

        assert_eq!(
            h.event_names(),
            vec![
                "auction_deployed",
                "commitment_added",
                "commitment_added",
                "auction_finalized",
                "tokens_claimed",
                "tokens_claimed",
            ]
        );
        assert!(auction.check_invariants().is_empty());

        let stats = auction.stats();
        assert_eq!(stats.commitments_accepted, 2);
        assert_eq!(stats.commitments_clamped, 1);
        assert_eq!(stats.claims_paid, 2);
    }

    #[test]
    fn test_full_auction_rejects_further_funds_without_moving_them() {
        let h = AuctionHarness::deploy(3, ServiceConfig::default()).unwrap();
        h.at(WINDOW / 2);
        h.service.commit(alice(), 1_500 * E18).unwrap();

        assert_eq!(h.service.commit(participant(3), 10 * E18), Ok(0));
        assert_eq!(h.payment.balance_of(participant(3)), BUDGET);
        assert_eq!(h.service.commitment_of(participant(3)), 0);
        assert_eq!(h.service.stats().commitments_zero, 1);
    }

    // =============================================================================
    // FAILURE PATH
    // =============================================================================

    #[test]
    fn test_failure_path_refunds_everyone() {
        let h = AuctionHarness::deploy(2, ServiceConfig::default()).unwrap();
        let auction = &h.service;

        h.at(10);
        auction.commit(alice(), 100 * E18).unwrap();
        auction.commit(bob(), 50 * E18).unwrap();

        let cap = h.admin().unwrap();
        h.at(WINDOW);
        assert_eq!(
            auction.finalize(Some(&cap)),
            Err(AuctionError::AuctionNotEnded {
                now: T + WINDOW,
                end: T + WINDOW
            })
        );

        h.at(WINDOW + 1);
        assert!(!auction.auction_succeeded());
        assert_eq!(auction.finalize(Some(&cap)), Ok(SettlementKind::Failure));
        assert_eq!(h.auctioned.balance_of(TREASURY), SUPPLY);
        assert_eq!(h.auctioned.custody_balance(), 0);

        assert_eq!(auction.withdraw(alice()), Ok(100 * E18));
        assert_eq!(auction.withdraw(alice()), Ok(0));
        assert_eq!(auction.withdraw(bob()), Ok(50 * E18));
        assert_eq!(h.payment.balance_of(alice()), BUDGET);
        assert_eq!(h.payment.balance_of(bob()), BUDGET);
        assert_eq!(h.payment.custody_balance(), 0);

        assert_eq!(
            auction.commit(alice(), E18),
            Err(AuctionError::AlreadyFinalized)
        );
        assert_eq!(
            h.event_names(),
            vec![
                "auction_deployed",
                "commitment_added",
                "commitment_added",
                "auction_finalized",
                "commitment_refunded",
                "commitment_refunded",
            ]
        );
        assert_eq!(auction.stats().refunds_paid, 2);
    }

    #[test]
    fn test_anyone_finalizes_after_grace() {
        let config = ServiceConfig {
            finalize_grace_period_secs: 60,
            ..ServiceConfig::default()
        };
        let h = AuctionHarness::deploy(1, config).unwrap();
        assert_eq!(h.service.finalize_deadline(), T + WINDOW + 60);

        h.at(10);
        h.service.commit(alice(), 10 * E18).unwrap();

        h.at(WINDOW + 60);
        assert_eq!(
            h.service.finalize(None),
            Err(AuctionError::FinalizeNotPermitted {
                now: T + WINDOW + 60,
                deadline: T + WINDOW + 60
            })
        );

        h.at(WINDOW + 61);
        assert_eq!(h.service.finalize(None), Ok(SettlementKind::Failure));
        assert_eq!(h.service.withdraw(alice()), Ok(10 * E18));
    }

    // =============================================================================
    // CANCELLATION
    // =============================================================================

    #[test]
    fn test_cancel_before_any_commitment() {
        let h = AuctionHarness::deploy(1, ServiceConfig::default()).unwrap();
        assert_eq!(h.service.phase(), AuctionPhase::Pending);

        let cap = h.admin().unwrap();
        assert_eq!(h.service.cancel(&cap), Ok(()));
        assert_eq!(h.service.phase(), AuctionPhase::Finalized);
        assert_eq!(h.auctioned.balance_of(TREASURY), SUPPLY);

        assert_eq!(h.service.withdraw(alice()), Ok(0));
        assert_eq!(h.service.cancel(&cap), Err(AuctionError::AlreadyFinalized));
        h.at(1);
        assert_eq!(
            h.service.commit(alice(), E18),
            Err(AuctionError::AlreadyFinalized)
        );
        assert_eq!(h.event_names(), vec!["auction_deployed", "auction_cancelled"]);
    }

    #[test]
    fn test_cancel_rejected_once_funds_committed() {
        let h = AuctionHarness::deploy(1, ServiceConfig::default()).unwrap();
        h.at(1);
        h.service.commit(alice(), E18).unwrap();

        let cap = h.admin().unwrap();
        assert_eq!(
            h.service.cancel(&cap),
            Err(AuctionError::CommitmentsExist(E18))
        );
        assert!(!h.service.is_finalized());
    }

    // =============================================================================
    // ADMINISTRATION
    // =============================================================================

    #[test]
    fn test_administrator_handover_and_setters() {
        let h = AuctionHarness::deploy(1, ServiceConfig::default()).unwrap();
        let auction = &h.service;
        let successor = Address::repeat(0xA2);
        let new_treasury = Address::repeat(0x7F);

        let old_cap = h.admin().unwrap();
        auction.transfer_administrator(&old_cap, successor).unwrap();

        assert_eq!(
            auction.set_treasury(&old_cap, new_treasury),
            Err(AuctionError::InvalidCapability)
        );
        assert_eq!(auction.authorize(ADMIN).err(), Some(AuctionError::Unauthorized(ADMIN)));

        let cap = auction.authorize(successor).unwrap();
        auction.set_treasury(&cap, new_treasury).unwrap();
        auction.set_schedule(&cap, T + 100, T + 2_000).unwrap();
        auction.set_prices(&cap, 3 * E18, E18).unwrap();

        let config = auction.auction_config();
        assert_eq!(config.treasury, new_treasury);
        assert_eq!((config.start_time, config.end_time), (T + 100, T + 2_000));
        assert_eq!(auction.price_drop_rate(), 2 * E18 / 1_900);

        h.at(100);
        assert!(auction.is_open());
        auction.commit(alice(), E18).unwrap();
        assert_eq!(
            auction.set_prices(&cap, 4 * E18, E18),
            Err(AuctionError::CommitmentsExist(E18))
        );

        for name in [
            "administrator_transferred",
            "treasury_updated",
            "schedule_updated",
            "prices_updated",
        ] {
            assert_eq!(h.log.named(name).len(), 1, "{name}");
        }
    }

    #[test]
    fn test_allow_list_gates_cumulative_commitments() {
        let h = AuctionHarness::deploy(2, ServiceConfig::default()).unwrap();
        let auction = &h.service;
        let cap = h.admin().unwrap();

        auction.enable_allow_list(&cap, true).unwrap();
        h.at(1);
        // Enabled without a list: nobody passes.
        assert_eq!(
            auction.commit(alice(), E18),
            Err(AuctionError::NotAllowListed {
                participant: alice(),
                cumulative: E18
            })
        );

        let list = Arc::new(InMemoryAllowList::new());
        list.allow(alice(), 50 * E18);
        auction.set_allow_list(&cap, list.clone()).unwrap();

        assert_eq!(auction.commit(alice(), 40 * E18), Ok(40 * E18));
        assert_eq!(
            auction.commit(alice(), 20 * E18),
            Err(AuctionError::NotAllowListed {
                participant: alice(),
                cumulative: 60 * E18
            })
        );
        assert!(matches!(
            auction.commit(bob(), E18),
            Err(AuctionError::NotAllowListed { .. })
        ));
        assert_eq!(h.payment.balance_of(bob()), BUDGET);

        auction.enable_allow_list(&cap, false).unwrap();
        assert_eq!(auction.commit(bob(), E18), Ok(E18));
        assert_eq!(auction.commitments_total(), 41 * E18);
    }

    // =============================================================================
    // DEPLOYMENT AND OBSERVATION
    // =============================================================================

    #[test]
    fn test_deploy_rejects_bad_parameters() {
        let past = AuctionParams {
            start_time: T - 200,
            ..default_params()
        };
        assert_eq!(
            AuctionHarness::deploy_with(past, 0, ServiceConfig::default()).err().map(|e| e.category()),
            Some(ErrorCategory::Configuration)
        );

        let inverted = AuctionParams {
            start_price: E18,
            floor_price: 2 * E18,
            ..default_params()
        };
        assert_eq!(
            AuctionHarness::deploy_with(inverted, 0, ServiceConfig::default()).err(),
            Some(AuctionError::InvalidPriceBounds {
                start: E18,
                floor: 2 * E18
            })
        );
    }

    #[test]
    fn test_views_follow_the_clock() {
        let h = AuctionHarness::deploy(1, ServiceConfig::default()).unwrap();
        let auction = &h.service;

        assert_eq!(auction.decay_price(), 2 * E18);
        assert_eq!(auction.price_drop_rate(), E18 / 1_000);
        assert!(!auction.is_open());

        h.at(250);
        assert_eq!(auction.phase(), AuctionPhase::Open);
        assert_eq!(auction.decay_price(), 7 * E18 / 4);
        assert_eq!(auction.clearing_price(), 7 * E18 / 4);
        assert_eq!(auction.demand_price(), 0);

        h.at(WINDOW + 5);
        assert_eq!(auction.phase(), AuctionPhase::Ended);
        assert_eq!(auction.decay_price(), E18);
        assert!(auction.has_ended());
        assert!(!auction.auction_succeeded());
    }

    #[test]
    fn test_event_stream_is_json_portable() {
        let config = ServiceConfig {
            trace_events: true,
            ..ServiceConfig::default()
        };
        let h = AuctionHarness::deploy(1, config).unwrap();
        h.at(1);
        h.service.commit(alice(), u128::from(u64::MAX) * 100).unwrap();

        let events = h.log.events();
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<AuctionEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
        assert!(matches!(
            back.first(),
            Some(AuctionEvent::AuctionDeployed { auction_id, .. }) if *auction_id == h.service.id()
        ));
    }
}
