use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use video_capture_core::{CaptureBackend, CaptureController, CaptureEvent, LiveStream};

/// A controller shared between the widget handle and its event sink.
pub type SharedController<B> = Rc<RefCell<CaptureController<B>>>;

struct SinkInner<B: CaptureBackend> {
    queue: RefCell<VecDeque<CaptureEvent<B::Stream>>>,
    controller: RefCell<Option<Weak<RefCell<CaptureController<B>>>>>,
}

/// Single entry point for intents and browser callbacks.
///
/// Events are queued and applied one at a time. A callback that fires while
/// the controller is already handling an event (a delegate reacting to a view
/// change, say) is queued and applied by the caller that holds the
/// controller, once the current event is done.
pub struct EventSink<B: CaptureBackend> {
    inner: Rc<SinkInner<B>>,
}

impl<B: CaptureBackend> Clone for EventSink<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: CaptureBackend> Default for EventSink<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: CaptureBackend> EventSink<B> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SinkInner {
                queue: RefCell::new(VecDeque::new()),
                controller: RefCell::new(None),
            }),
        }
    }

    /// Route events to `controller`, applying anything queued before now.
    pub fn attach(&self, controller: &SharedController<B>) {
        *self.inner.controller.borrow_mut() = Some(Rc::downgrade(controller));
        self.drain();
    }

    pub fn post(&self, event: CaptureEvent<B::Stream>) {
        self.inner.queue.borrow_mut().push_back(event);
        self.drain();
    }

    /// Events waiting to be applied.
    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    fn drain(&self) {
        let target = self.inner.controller.borrow().clone();
        let Some(target) = target else {
            return;
        };
        let Some(shared) = target.upgrade() else {
            self.discard_all();
            return;
        };
        let Ok(mut controller) = shared.try_borrow_mut() else {
            return;
        };

        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            // failures are logged and reported by the controller
            let _ = controller.handle(event);
        }
    }

    /// The controller is gone: drop queued events, stopping any late stream.
    fn discard_all(&self) {
        let events: Vec<_> = self.inner.queue.borrow_mut().drain(..).collect();
        for event in events {
            if let CaptureEvent::DeviceAcquired {
                result: Ok(mut stream), ..
            } = event
            {
                log::warn!("releasing stream {} delivered after teardown", stream.id());
                stream.stop_tracks();
            }
        }
    }
}
