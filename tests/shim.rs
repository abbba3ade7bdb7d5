use extlink::shim::{self, TerminateReason};
use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Terminator that records why it was entered, then parks forever. It must
/// never return; a test sentinel placed after the termination call verifies
/// that it doesn't.
static LAST_REASON: AtomicUsize = AtomicUsize::new(0);

fn recording_terminator(reason: TerminateReason) -> ! {
    let code = match reason {
        TerminateReason::Abort => 1,
        TerminateReason::Exit(status) => 100 + status as usize,
        TerminateReason::ExitImmediate(status) => 200 + status as usize,
    };
    LAST_REASON.store(code, Ordering::SeqCst);
    loop {
        thread::park();
    }
}

fn wait_for_reason(code: usize) {
    for _ in 0..100 {
        if LAST_REASON.load(Ordering::SeqCst) == code {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("terminator never saw reason code {code}");
}

#[test]
fn dso_handle_is_a_stable_unique_token() {
    let first = shim::dso_handle();
    let second = shim::dso_handle();
    assert!(!first.is_null());
    assert_eq!(first, second);
    assert_ne!(first, shim::pure_virtual_trap as *const ());
    assert_ne!(first, shim::deleted_virtual_trap as *const ());
}

#[test]
fn dispatch_guards_return_without_effect() {
    // Calling a guard indicates a corrupted vtable; the contract here is
    // only that control comes back without undefined behavior.
    shim::pure_virtual_trap();
    shim::deleted_virtual_trap();
}

#[test]
fn static_dtor_registration_succeeds_but_never_fires() {
    static FIRED: AtomicBool = AtomicBool::new(false);

    unsafe extern "C" fn dtor(_arg: *mut c_void) {
        FIRED.store(true, Ordering::SeqCst);
    }

    let rc = shim::register_static_dtor(Some(dtor), std::ptr::null_mut(), std::ptr::null_mut());
    assert_eq!(rc, 0);

    thread::sleep(Duration::from_millis(50));
    assert!(!FIRED.load(Ordering::SeqCst), "registered dtor must never run");
}

#[test]
fn termination_primitives_never_return() {
    assert!(shim::install_terminator(recording_terminator));
    // First install wins; a second install is refused.
    assert!(!shim::install_terminator(recording_terminator));

    static SENTINEL: AtomicBool = AtomicBool::new(false);

    thread::spawn(|| {
        shim::exit(7);
        // Unreachable by contract.
        #[allow(unreachable_code)]
        SENTINEL.store(true, Ordering::SeqCst);
    });
    wait_for_reason(107);
    thread::sleep(Duration::from_millis(100));
    assert!(!SENTINEL.load(Ordering::SeqCst), "exit returned to its caller");

    thread::spawn(|| {
        shim::abort();
    });
    wait_for_reason(1);

    thread::spawn(|| {
        shim::exit_immediate(3);
    });
    wait_for_reason(203);
}
