/*!
Echoes - polled conditions over a live document

```ignore
use echoes::{Echoes, NodeId, Outcome, SimDocument};

// Bind a context to a document (`WebDom` in the browser)
let doc = Arc::new(SimDocument::new());
let echoes = Echoes::builder().debug(true).build(doc.clone());

// Register named conditions
let button = doc.create_element("button");
doc.append_child(NodeId::BODY, button);
echoes.add_event("pressed", echoes.click(button));
echoes.add_event("scroll", echoes.scroll_position());

// Poll them from a frame loop. The closure holds the context, so the loop
// runs until cancelled.
let lifecycle = echoes.lifecycle();
let ctx = echoes.clone();
let updates = lifecycle.on_update(move || {
    if ctx.check_event("pressed") == Some(Outcome::Flag(true)) {
        ctx.add_class(button, "pressed");
    }
}, 30.0);

// Or sweep everything and subscribe to what fired
let mut events = echoes.subscribe();
echoes.poll_events();
while let Ok(event) = events.try_recv() {
    // handle event
}

if let Some(updates) = updates {
    updates.cancel();
}
```
*/

mod clock;
mod conditions;
mod core;
mod lifecycle;
mod logging;
mod platform;

mod types;
pub use types::*;

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::conditions::{
  Click, Condition, Hover, MousePosition, PageSize, ScrollPosition, StyleCondition, StyleMode,
  TabFocus, WebInfo,
};
pub use crate::core::{Echoes, EchoesBuilder};
pub use crate::lifecycle::{FrameThrottle, Lifecycle, UpdateHandle, DEFAULT_FPS, FRAME_SLACK_MS};
pub use crate::platform::{
  Dom, DomEvent, DomEventKind, EventTarget, FrameCallback, Listener, ReadyCallback, SimDocument,
  StyleProperty,
};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use crate::platform::WebDom;
