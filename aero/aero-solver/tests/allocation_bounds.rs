//! Allocation bounds of the solver hot path.
//!
//! The AIC assembly and the circulation loop run on preallocated state; this
//! test pins that contract with a counting global allocator. Both checks
//! live in a single test function so no other test can allocate
//! concurrently.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use aero_solver::{
    calculate_aic_matrices, gamma_loop, AerodynamicModel, BodyAerodynamics, SolverConfig,
    SolverState,
};
use aero_types::{Point3, Section, SectionModel, Vector3};
use aero_wing::Wing;

struct CountingAllocator;

static COUNTING: AtomicBool = AtomicBool::new(false);
static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNTING.load(Ordering::Relaxed) {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        }
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if COUNTING.load(Ordering::Relaxed) {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        }
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNTING.load(Ordering::Relaxed) {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        }
        unsafe { System.realloc(ptr, layout, new_size) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn count_allocations(f: impl FnOnce()) -> usize {
    ALLOCATIONS.store(0, Ordering::SeqCst);
    COUNTING.store(true, Ordering::SeqCst);
    f();
    COUNTING.store(false, Ordering::SeqCst);
    ALLOCATIONS.load(Ordering::SeqCst)
}

#[test]
fn hot_path_respects_allocation_budgets() {
    let mut wing = Wing::new(20).unwrap();
    for y in [10.0, -10.0] {
        wing.add_section(Section::new(
            Point3::new(0.0, y, 0.0),
            Point3::new(1.0, y, 0.0),
            SectionModel::Inviscid,
        ));
    }
    let mut body = BodyAerodynamics::new(vec![wing], Point3::origin()).unwrap();
    let alpha = 5.0_f64.to_radians();
    body.set_va(
        Vector3::new(20.0 * alpha.cos(), 0.0, 20.0 * alpha.sin()),
        Vector3::zeros(),
    )
    .unwrap();

    let config = SolverConfig::default();
    let mut state = SolverState::new(body.panel_count());
    state.prepare(&body, &config).unwrap();

    // Warm up once so lazy one-time setup (logging callsites and the like)
    // does not land in the measured calls
    calculate_aic_matrices(&body, AerodynamicModel::Vsm, 1e-20, &mut state);
    gamma_loop(&body, &config, &mut state).unwrap();
    state.prepare(&body, &config).unwrap();

    let aic_allocations = count_allocations(|| {
        calculate_aic_matrices(&body, AerodynamicModel::Vsm, 1e-20, &mut state);
    });
    assert!(
        aic_allocations <= 100,
        "AIC assembly allocated {aic_allocations} times"
    );

    let loop_allocations = count_allocations(|| {
        gamma_loop(&body, &config, &mut state).unwrap();
    });
    assert!(
        loop_allocations <= 10,
        "gamma loop allocated {loop_allocations} times"
    );
}
