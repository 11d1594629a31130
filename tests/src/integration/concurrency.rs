//! # Shared-Instance Concurrency
//!
//! One auction behind an `Arc`, driven from several threads. Mutating calls
//! are serialized: a caller on another thread waits for the call in flight
//! to finish, then runs against the updated state. Nothing is double-counted.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use dutch_auction::prelude::*;
    use parking_lot::Mutex;

    use crate::harness::*;

    /// Ledger whose pulls take a while, keeping a commit in flight.
    struct SlowLedger {
        inner: InMemoryLedger,
        delay: Duration,
    }

    impl AssetLedger for SlowLedger {
        fn asset_id(&self) -> AssetId {
            self.inner.asset_id()
        }

        fn decimals(&self) -> u8 {
            self.inner.decimals()
        }

        fn transfer_from(&self, owner: Address, amount: u128) -> Result<(), LedgerError> {
            thread::sleep(self.delay);
            self.inner.transfer_from(owner, amount)
        }

        fn transfer(&self, recipient: Address, amount: u128) -> Result<(), LedgerError> {
            self.inner.transfer(recipient, amount)
        }

        fn custody_balance(&self) -> u128 {
            self.inner.custody_balance()
        }
    }

    #[test]
    fn test_caller_on_other_thread_waits_for_transfer_in_flight() {
        init_test_logging();
        let delay = Duration::from_millis(200);
        let slow = |asset: u8| SlowLedger {
            inner: InMemoryLedger::new(AssetId::new([asset; 20]), 18),
            delay,
        };
        let auctioned = Arc::new(slow(0xA1));
        let payment = Arc::new(slow(0xB2));
        auctioned.inner.mint(FUNDER, SUPPLY).unwrap();
        auctioned.inner.approve(FUNDER, SUPPLY);
        for n in 1..=2u8 {
            payment.inner.mint(participant(n), BUDGET).unwrap();
            payment.inner.approve(participant(n), BUDGET);
        }
        let clock = ManualClock::new(T - 100);
        let service = Arc::new(
            DutchAuctionService::new(
                default_params(),
                AuctionPorts {
                    auctioned,
                    payment: payment.clone(),
                    clock: clock.clone(),
                    events: Arc::new(InMemoryEventLog::new()),
                },
                ServiceConfig::default(),
            )
            .unwrap(),
        );
        clock.set_time(T + 1);

        let started = Instant::now();
        let first = {
            let service = Arc::clone(&service);
            thread::spawn(move || service.commit(participant(1), E18))
        };
        thread::sleep(Duration::from_millis(50));
        let second = {
            let service = Arc::clone(&service);
            thread::spawn(move || service.commit(participant(2), E18))
        };

        assert_eq!(first.join().unwrap(), Ok(E18));
        assert_eq!(second.join().unwrap(), Ok(E18));
        // the second pull only started once the first commit finished
        assert!(started.elapsed() >= delay * 2);
        assert_eq!(service.commitments_total(), 2 * E18);
        assert_eq!(payment.custody_balance(), 2 * E18);
        assert!(service.check_invariants().is_empty());
    }

    #[test]
    fn test_parallel_commits_land_exactly_once() {
        let h = AuctionHarness::deploy(8, ServiceConfig::default()).unwrap();
        h.at(1);

        let workers: Vec<_> = (1..=8u8)
            .map(|n| {
                let service = Arc::clone(&h.service);
                thread::spawn(move || {
                    for _ in 0..10 {
                        assert_eq!(service.commit(participant(n), 10 * E18), Ok(10 * E18));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(h.service.commitments_total(), 800 * E18);
        assert_eq!(h.payment.custody_balance(), 800 * E18);
        for n in 1..=8u8 {
            assert_eq!(h.service.commitment_of(participant(n)), 100 * E18);
        }
        let stats = h.service.stats();
        assert_eq!(stats.commitments_accepted, 80);
        assert_eq!(stats.rejected_calls, 0);
        assert_eq!(h.log.named("commitment_added").len(), 80);
        assert!(h.service.check_invariants().is_empty());
    }

    #[test]
    fn test_parallel_claims_pay_each_participant_once() {
        let h = AuctionHarness::deploy(6, ServiceConfig::default()).unwrap();
        h.at(WINDOW / 2);
        for n in 1..=6u8 {
            h.service.commit(participant(n), 250 * E18).unwrap();
        }
        assert!(h.service.auction_succeeded());
        let cap = h.admin().unwrap();
        h.service.finalize(Some(&cap)).unwrap();

        let workers: Vec<_> = (1..=6u8)
            .map(|n| {
                let service = Arc::clone(&h.service);
                thread::spawn(move || (service.withdraw(participant(n)), service.withdraw(participant(n))))
            })
            .collect();

        for (n, worker) in (1..=6u8).zip(workers) {
            let (first, second) = worker.join().unwrap();
            assert_eq!(first, Ok(166_666_666_666_666_666_666));
            assert_eq!(second, Err(AuctionError::NothingToClaim(participant(n))));
        }
        // 250 / 1.5 truncates once per participant.
        assert_eq!(h.auctioned.custody_balance(), 4);
        assert!(h.service.check_invariants().is_empty());
    }

    #[test]
    fn test_readers_never_observe_shrinking_totals() {
        let h = AuctionHarness::deploy(4, ServiceConfig::default()).unwrap();
        h.at(1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = {
            let service = Arc::clone(&h.service);
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                for _ in 0..500 {
                    seen.lock().push(service.commitments_total());
                    thread::yield_now();
                }
            })
        };

        for round in 0..25u8 {
            h.service.commit(participant(round % 4 + 1), E18).unwrap();
        }
        reader.join().unwrap();

        let seen = seen.lock();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().all(|total| *total <= 25 * E18));
        assert_eq!(h.service.commitments_total(), 25 * E18);
    }
}
