//! Concurrent park/unpark stress tests against one shared garage

use garage_rs::{Garage, GarageError, Vehicle, VehicleCategory};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_8_threads_park_and_unpark() {
    let garage = Arc::new(Garage::new(4, 25).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|thread_id| {
            let garage = Arc::clone(&garage);
            std::thread::spawn(move || {
                for i in 0..200 {
                    let id = format!("T{}-{}", thread_id, i % 10);
                    let category = VehicleCategory::ALL[rand::random::<usize>() % 3];
                    match garage.park(Vehicle::try_new(&id, category).unwrap()) {
                        Ok(_)
                        | Err(GarageError::AlreadyParked(_))
                        | Err(GarageError::NoSuitableSpace { .. }) => {}
                        Err(e) => panic!("unexpected park error: {}", e),
                    }
                    if rand::random::<bool>() {
                        let _ = garage.unpark(&id);
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    garage.check_invariants().unwrap();

    let free: usize = garage.availability().iter().map(|l| l.free).sum();
    let demand: usize = garage
        .parked()
        .iter()
        .map(|p| p.category.slots_needed())
        .sum();
    assert_eq!(free + demand, garage.total_slots());
}

#[test]
fn test_same_id_parked_once_under_contention() {
    let garage = Arc::new(Garage::new(2, 50).unwrap());
    let successes = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let garage = Arc::clone(&garage);
            let successes = Arc::clone(&successes);
            std::thread::spawn(move || {
                let car = Vehicle::try_new("SHARED", VehicleCategory::Standard).unwrap();
                if garage.park(car).is_ok() {
                    successes.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(successes.load(Ordering::Relaxed), 1);
    assert_eq!(garage.parked_count(), 1);
}

#[test]
fn test_no_slot_handed_out_twice() {
    let garage = Arc::new(Garage::new(3, 20).unwrap());

    let handles: Vec<_> = (0..6)
        .map(|thread_id| {
            let garage = Arc::clone(&garage);
            std::thread::spawn(move || {
                let mut placed = Vec::new();
                for i in 0..20 {
                    let id = format!("W{}-{}", thread_id, i);
                    let category = if i % 3 == 0 {
                        VehicleCategory::Large
                    } else {
                        VehicleCategory::Compact
                    };
                    if let Ok(location) = garage.park(Vehicle::try_new(&id, category).unwrap()) {
                        placed.push(location);
                    }
                }
                placed
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for h in handles {
        for location in h.join().unwrap() {
            for slot in location.slots {
                assert!(
                    seen.insert((location.level, slot)),
                    "slot {} on level {} handed out twice",
                    slot,
                    location.level
                );
            }
        }
    }

    // 6 threads x (7 trucks + 13 bikes) ask for 162 slots, only 60 exist
    let free: usize = garage.availability().iter().map(|l| l.free).sum();
    assert_eq!(seen.len(), garage.total_slots() - free);
    garage.check_invariants().unwrap();
}
