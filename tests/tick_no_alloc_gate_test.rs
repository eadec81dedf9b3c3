use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_snake::core::{GameSnapshot, Phase, Session, SessionConfig};
use tui_snake::term::{FrameBuffer, GameView, PixelView, RemoteStatus, View, Viewport};
use tui_snake::types::Direction;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

// One test per binary: the counter is process-wide.
#[test]
fn tick_snapshot_and_render_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let config = SessionConfig::new(16, 12, 100, Some(7)).unwrap();
    let mut session = Session::new(config).unwrap();
    session.start();

    let mut snap = GameSnapshot::default();
    snap.snake.reserve(config.board.cell_count());

    // Sweep the board in a zig-zag so the snake eats, grows and eventually dies.
    let pattern = [
        Direction::Down,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    let mut restarts = 0;
    for round in 0..20 {
        let allocs = with_alloc_counting(|| {
            for i in 0..50 {
                let request = if i % 7 == 0 {
                    Some(pattern[(i / 7 + round) % pattern.len()])
                } else {
                    None
                };
                let _ = session.tick(request);
                session.snapshot_into(&mut snap);
            }
        });
        assert_eq!(allocs, 0, "round {round} allocated");

        // Restart builds a fresh state and is allowed to allocate.
        if session.phase() == Phase::Terminated {
            session.restart().unwrap();
            restarts += 1;
        }
    }
    assert!(restarts > 0);

    // Views render into a reused framebuffer.
    let vp = Viewport::new(60, 20);
    let remote = RemoteStatus {
        clients: 2,
        controller_id: Some(1),
    };
    let mut fb = FrameBuffer::new(vp.width, vp.height);
    let chars = GameView::default();
    let pixels = PixelView::new();
    chars.render_into(&snap, Some(&remote), vp, &mut fb);

    let allocs = with_alloc_counting(|| {
        for _ in 0..10 {
            let _ = session.tick(None);
            session.snapshot_into(&mut snap);
            chars.render_into(&snap, Some(&remote), vp, &mut fb);
            pixels.render_into(&snap, None, vp, &mut fb);
        }
    });
    assert_eq!(allocs, 0);
}
