//! At-most-once winner assignment under contention.
//!
//! Many bidders race each other and the decay timer; exactly one acceptance
//! may succeed and its price must be the price decay froze at.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use auctionkit_dutch::DescendingPriceAuction;
use auctionkit_types::*;
use rust_decimal::Decimal;

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

#[test]
fn racing_threads_single_winner() {
    let auction = Arc::new(
        DescendingPriceAuction::new(DutchAuctionConfig::new(
            dec(100),
            dec(50),
            dec(10),
            Duration::from_secs(1),
        ))
        .unwrap(),
    );
    let successes = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let auction = Arc::clone(&auction);
            let successes = Arc::clone(&successes);
            thread::spawn(move || {
                let result = auction.accept_bid(format!("bidder-{i}"));
                if result.success {
                    successes.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(result.price, dec(100));
                } else {
                    assert_eq!(result.price, Decimal::ZERO);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert!(auction.winner().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn acceptance_races_live_ticks() {
    let auction = Arc::new(
        DescendingPriceAuction::new(DutchAuctionConfig::new(
            dec(10_000),
            dec(0),
            dec(1),
            Duration::from_millis(1),
        ))
        .unwrap(),
    );
    auction.start().unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let mut tasks = Vec::new();
    for i in 0..16u64 {
        let auction = Arc::clone(&auction);
        tasks.push(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(i % 4)).await;
            auction.accept_bid(format!("bidder-{i}"))
        }));
    }

    let mut winners = Vec::new();
    for t in tasks {
        let result = t.await.unwrap();
        if result.success {
            winners.push(result.price);
        }
    }

    assert_eq!(winners.len(), 1, "exactly one acceptance may succeed");
    let sold_at = winners[0];
    assert_eq!(auction.current_price(), sold_at);
    assert!(!auction.is_running());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(
        auction.current_price(),
        sold_at,
        "no tick may land after the sale"
    );
}
