//! App - Navigation, render and input-binding engine
//!
//! The app owns the current route state, a single record of
//!
//! ```text
//! (route key, props, page instance, listener set)
//! ```
//!
//! which is replaced in one assignment on every render and never patched
//! in place. Navigation always mounts a fresh page, even when the route is
//! unchanged.
//!
//! # Render steps
//!
//! 1. Construct the page with the caller's props plus `navigate` and
//!    `watch_face`
//! 2. Detach the previous listener set, attach one for the new page
//! 3. `page_will_load`
//! 4. `render` to markup
//! 5. Replace the display region's content with that markup
//! 6. `page_did_load`
//!
//! # Notifications
//!
//! The app follows the notification hub. A request writes the overlay into
//! the notification container. A dismissal clears it and replays the
//! current location with the last props, remounting the page underneath.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::dom::{Element, Location, LocationSnapshot, WatchDocument, fragment_of};
use crate::error::Result;
use crate::notification::{hub, Notification, NotificationForm, NotificationSpec};
use crate::page::PageProps;
use crate::router::{normalize_path, ResolvedRoute, RouteTable};
use crate::types::{Inputs, Props};

use super::listeners::{ListenerSet, PageHandle, WatchElements};
use super::navigator::Navigator;

// =============================================================================
// STATE
// =============================================================================

/// Whether the page or the notification overlay is in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    PageVisible,
    NotificationVisible,
}

struct CurrentRoute {
    key: String,
    page_name: &'static str,
    props: Props,
    page: PageHandle,
    listeners: ListenerSet,
}

pub(crate) struct AppInner {
    routes: RefCell<Rc<RouteTable>>,
    elements: WatchElements,
    location: Location,
    form: NotificationForm,
    last_props: RefCell<Props>,
    current: RefCell<Option<CurrentRoute>>,
    display: Cell<DisplayState>,
    mounts: Cell<u64>,
    subscriptions: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl Drop for AppInner {
    fn drop(&mut self) {
        for cleanup in self.subscriptions.get_mut().drain(..) {
            cleanup();
        }
        if let Some(current) = self.current.get_mut().take() {
            current.listeners.unbind();
        }
    }
}

// =============================================================================
// APP
// =============================================================================

/// The navigation engine. Cheap to clone; clones drive the same state.
#[derive(Clone)]
pub struct App {
    pub(super) inner: Rc<AppInner>,
}

impl App {
    /// Build the engine for a document.
    ///
    /// Element handles are resolved here, once. Fails if the document is
    /// missing any of the watch template's elements.
    pub fn new(
        routes: RouteTable,
        notifications: Vec<NotificationSpec>,
        document: &WatchDocument,
    ) -> Result<Self> {
        let elements = WatchElements::resolve(document)?;
        let app = Self {
            inner: Rc::new(AppInner {
                routes: RefCell::new(Rc::new(routes)),
                elements,
                location: document.location(),
                form: NotificationForm::new(notifications),
                last_props: RefCell::new(Props::new()),
                current: RefCell::new(None),
                display: Cell::new(DisplayState::PageVisible),
                mounts: Cell::new(0),
                subscriptions: RefCell::new(Vec::new()),
            }),
        };
        app.subscribe_notifications();
        tracing::debug!(routes = ?app.inner.routes.borrow().keys(), "app created");
        Ok(app)
    }

    fn subscribe_notifications(&self) {
        let weak = Rc::downgrade(&self.inner);
        let hide = hub::on_hide(move || {
            if let Some(inner) = weak.upgrade() {
                App { inner }.hide_notification();
            }
        });

        let weak = Rc::downgrade(&self.inner);
        let show = hub::on_show(move |notification| {
            if let Some(inner) = weak.upgrade() {
                App { inner }.show_notification(notification);
            }
        });

        let mut subscriptions = self.inner.subscriptions.borrow_mut();
        subscriptions.push(Box::new(hide));
        subscriptions.push(Box::new(show));
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Navigate to `path` with `props`.
    ///
    /// Stores `props` as the last props, resolves the route (falling back to
    /// the not-found page), projects the key into the location hash and
    /// renders into the display region.
    pub fn navigate(&self, path: &str, props: Props) {
        *self.inner.last_props.borrow_mut() = props.clone();

        let routes = Rc::clone(&self.inner.routes.borrow());
        let Some(route) = routes.resolve(path) else {
            tracing::warn!(path, "unresolvable route and no fallback route registered");
            return;
        };

        tracing::debug!(
            path,
            key = %route.key,
            page = route.page.name(),
            matched = route.matched,
            "navigate"
        );

        // Project first so a navigation issued from inside the new page's
        // hooks leaves its own key in the address.
        self.inner.location.set_hash(&route.key);
        let element = self.inner.elements.watch_face.clone();
        self.render(&element, &route, props);
    }

    /// Navigate to the page named by a location's hash fragment.
    pub fn navigate_to_location(&self, location: &LocationSnapshot, props: Props) {
        let path = normalize_path(&location.hash);
        self.navigate(path, props);
    }

    /// Mount `route`'s page into `element`.
    pub fn render(&self, element: &Element, route: &ResolvedRoute, props: Props) {
        let page: PageHandle = Rc::new(RefCell::new(route.page.create(PageProps {
            props: props.clone(),
            navigate: self.navigator(),
            watch_face: self.inner.elements.watch_face.clone(),
        })));

        {
            let mut current = self.inner.current.borrow_mut();
            if let Some(previous) = current.take() {
                previous.listeners.unbind();
            }
            let listeners = ListenerSet::bind(&self.inner.elements, &page);
            tracing::trace!(inputs = ?listeners.inputs(), bindings = listeners.len(), "listeners rebound");
            *current = Some(CurrentRoute {
                key: route.key.clone(),
                page_name: route.page.name(),
                props,
                page: Rc::clone(&page),
                listeners,
            });
        }
        self.inner.mounts.set(self.inner.mounts.get() + 1);

        page.borrow_mut().page_will_load();
        if !self.is_mounted(&page) {
            tracing::debug!(key = %route.key, "page replaced during will-load; render skipped");
            return;
        }
        let markup = page.borrow().render();
        element.set_inner_html(markup);
        page.borrow_mut().page_did_load();
    }

    /// Whether `page` is still the mounted page.
    fn is_mounted(&self, page: &PageHandle) -> bool {
        self.inner
            .current
            .borrow()
            .as_ref()
            .is_some_and(|c| Rc::ptr_eq(&c.page, page))
    }

    /// Handle for pages and host code to navigate without owning the app.
    pub fn navigator(&self) -> Navigator {
        Navigator::new(Rc::downgrade(&self.inner))
    }

    /// Follow external hash changes on the document's location.
    ///
    /// Each change navigates to the fragment of the new URL with empty
    /// props.
    pub fn listen_hash_changes(&self) -> HashChangeHandle {
        let weak = Rc::downgrade(&self.inner);
        let cleanup = self.inner.location.on_hash_change(move |event| {
            if let Some(inner) = weak.upgrade() {
                let page_name = fragment_of(&event.new_url).to_string();
                App { inner }.navigate(&page_name, Props::new());
            }
        });
        HashChangeHandle {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    fn show_notification(&self, notification: &Notification) {
        self.inner.display.set(DisplayState::NotificationVisible);
        self.inner
            .elements
            .notification_container
            .set_inner_html(NotificationForm::overlay_markup(notification));
    }

    fn hide_notification(&self) {
        self.inner.display.set(DisplayState::PageVisible);
        self.inner.elements.notification_container.set_inner_html("");
        let props = self.last_props();
        self.navigate_to_location(&self.inner.location.snapshot(), props);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Replace the route table. Takes effect on the next navigation.
    pub fn set_routes(&self, routes: RouteTable) {
        *self.inner.routes.borrow_mut() = Rc::new(routes);
    }

    pub fn routes(&self) -> Rc<RouteTable> {
        Rc::clone(&self.inner.routes.borrow())
    }

    /// Key of the mounted route.
    pub fn current_route(&self) -> Option<String> {
        self.inner.current.borrow().as_ref().map(|c| c.key.clone())
    }

    /// Name of the mounted page implementation.
    pub fn current_page_name(&self) -> Option<&'static str> {
        self.inner.current.borrow().as_ref().map(|c| c.page_name)
    }

    /// Props the mounted page was built with.
    pub fn current_props(&self) -> Option<Props> {
        self.inner.current.borrow().as_ref().map(|c| c.props.clone())
    }

    /// Props of the most recent `navigate` call.
    pub fn last_props(&self) -> Props {
        self.inner.last_props.borrow().clone()
    }

    pub fn display_state(&self) -> DisplayState {
        self.inner.display.get()
    }

    /// Inputs bound to the mounted page. Empty before the first navigation.
    pub fn bound_inputs(&self) -> Inputs {
        self.inner
            .current
            .borrow()
            .as_ref()
            .map(|c| c.listeners.inputs())
            .unwrap_or_default()
    }

    /// Number of pages mounted so far.
    pub fn mount_count(&self) -> u64 {
        self.inner.mounts.get()
    }

    pub fn elements(&self) -> &WatchElements {
        &self.inner.elements
    }

    pub fn location(&self) -> Location {
        self.inner.location.clone()
    }

    pub fn notification_form(&self) -> &NotificationForm {
        &self.inner.form
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("current_route", &self.current_route())
            .field("display", &self.display_state())
            .field("mounts", &self.mount_count())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// HASH CHANGE HANDLE
// =============================================================================

/// Cleanup handle for the hash-change subscription.
pub struct HashChangeHandle {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl HashChangeHandle {
    /// Stop following hash changes.
    pub fn cleanup(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Page, PageType};
    use crate::router::FALLBACK_KEY;
    use crate::types::KeyEvent;
    use pretty_assertions::assert_eq;

    struct Plain;
    impl Page for Plain {
        fn template(&self) -> String {
            "<div>Some page</div>".to_string()
        }
    }
    impl PageType for Plain {
        fn create(_: PageProps) -> Self {
            Plain
        }
    }

    struct Message {
        props: PageProps,
    }
    impl Page for Message {
        fn template(&self) -> String {
            format!("<div>{}</div>", self.props.get_str("message").unwrap_or(""))
        }
    }
    impl PageType for Message {
        fn create(props: PageProps) -> Self {
            Message { props }
        }
    }

    /// Navigates to `next` on face tap.
    struct Linker {
        props: PageProps,
    }
    impl Page for Linker {
        fn template(&self) -> String {
            "<div>linker</div>".to_string()
        }
        fn face_button_event(&mut self) {
            let next = self.props.get_str("next").unwrap_or("/").to_string();
            self.props.navigate.navigate(&next, Props::new());
        }
    }
    impl PageType for Linker {
        fn create(props: PageProps) -> Self {
            Linker { props }
        }
    }

    /// Redirects to `home` before rendering.
    struct Redirect {
        props: PageProps,
    }
    impl Page for Redirect {
        fn page_will_load(&mut self) {
            self.props.navigate.navigate("home", Props::new());
        }
        fn template(&self) -> String {
            "<div>redirect</div>".to_string()
        }
        fn page_did_load(&mut self) {
            self.props.watch_face.set_inner_html("<div>redirect loaded</div>");
        }
    }
    impl PageType for Redirect {
        fn create(props: PageProps) -> Self {
            Redirect { props }
        }
    }

    struct Home;
    impl Page for Home {
        fn template(&self) -> String {
            "<div>home</div>".to_string()
        }
    }
    impl PageType for Home {
        fn create(_: PageProps) -> Self {
            Home
        }
    }

    fn setup() -> WatchDocument {
        hub::reset();
        WatchDocument::default()
    }

    fn face(doc: &WatchDocument) -> Element {
        doc.get_element_by_id("watch-face").unwrap()
    }

    #[test]
    fn test_navigate_renders_and_projects_hash() {
        let doc = setup();
        let app = App::new(RouteTable::new().route::<Plain>("/"), vec![], &doc).unwrap();

        app.navigate("/", Props::new());

        assert_eq!(face(&doc).inner_html(), "<div>Some page</div>");
        assert_eq!(app.current_route().as_deref(), Some("/"));
        assert_eq!(doc.location().hash(), "#/");
        assert_eq!(app.bound_inputs(), Inputs::BUTTONS | Inputs::KEYBOARD);
    }

    #[test]
    fn test_fallback_keeps_requested_key_in_hash() {
        let doc = setup();
        let routes = RouteTable::new()
            .route::<Plain>("/")
            .route::<Message>(FALLBACK_KEY);
        let app = App::new(routes, vec![], &doc).unwrap();

        app.navigate("someRandomPage", Props::new().with("message", "Oops"));

        assert_eq!(face(&doc).inner_html(), "<div>Oops</div>");
        assert_eq!(doc.location().hash(), "#someRandomPage");
        assert!(app.current_page_name().unwrap().ends_with("Message"));
    }

    #[test]
    fn test_missing_fallback_leaves_state_untouched() {
        let doc = setup();
        let app = App::new(RouteTable::new().route::<Plain>("/"), vec![], &doc).unwrap();
        app.navigate("/", Props::new());

        app.navigate("nowhere", Props::new().with("x", 1));

        assert_eq!(app.current_route().as_deref(), Some("/"));
        assert_eq!(app.mount_count(), 1);
        assert_eq!(doc.location().hash(), "#/");
        // The props are still recorded as the last props.
        assert_eq!(app.last_props(), Props::new().with("x", 1));
    }

    #[test]
    fn test_page_can_navigate_from_handler() {
        let doc = setup();
        let routes = RouteTable::new()
            .route::<Linker>("/")
            .route::<Plain>("next");
        let app = App::new(routes, vec![], &doc).unwrap();

        app.navigate("/", Props::new().with("next", "next"));
        face(&doc).click();

        assert_eq!(app.current_route().as_deref(), Some("next"));
        assert_eq!(face(&doc).inner_html(), "<div>Some page</div>");
        assert_eq!(doc.location().hash(), "#next");
        assert_eq!(app.last_props(), Props::new());
    }

    #[test]
    fn test_redirect_from_will_load_shows_target_page() {
        let doc = setup();
        let routes = RouteTable::new()
            .route::<Redirect>("old")
            .route::<Home>("home");
        let app = App::new(routes, vec![], &doc).unwrap();

        app.navigate("old", Props::new());

        assert_eq!(app.current_route().as_deref(), Some("home"));
        assert_eq!(doc.location().hash(), "#home");
        assert_eq!(face(&doc).inner_html(), "<div>home</div>");
        assert!(app.current_page_name().unwrap().ends_with("Home"));
        assert_eq!(app.mount_count(), 2);
    }

    #[test]
    fn test_hash_change_navigates_with_empty_props() {
        let doc = setup();
        let routes = RouteTable::new()
            .route::<Message>("/")
            .route::<Plain>("contacts");
        let app = App::new(routes, vec![], &doc).unwrap();
        let handle = app.listen_hash_changes();

        app.navigate("/", Props::new().with("message", "hello"));
        doc.location().change_hash("contacts");

        assert_eq!(app.current_route().as_deref(), Some("contacts"));
        assert_eq!(app.last_props(), Props::new());

        handle.cleanup();
        doc.location().change_hash("/");
        assert_eq!(app.current_route().as_deref(), Some("contacts"));
    }

    #[test]
    fn test_engine_projection_does_not_loop_through_hash_change() {
        let doc = setup();
        let app = App::new(RouteTable::new().route::<Plain>("/"), vec![], &doc).unwrap();
        let _handle = app.listen_hash_changes();

        app.navigate("/", Props::new());
        assert_eq!(app.mount_count(), 1);
    }

    #[test]
    fn test_notification_show_and_hide() {
        let doc = setup();
        let specs = vec![NotificationSpec::new("message", "New message", "Hi")];
        let app = App::new(RouteTable::new().route::<Message>("/"), specs, &doc).unwrap();
        app.navigate("/", Props::new().with("message", "hello"));

        assert!(app.notification_form().trigger("message", None));
        let container = doc.get_element_by_id("notification-container").unwrap();
        assert_eq!(app.display_state(), DisplayState::NotificationVisible);
        assert!(container.inner_html().contains("New message"));

        hub::hide();
        assert_eq!(app.display_state(), DisplayState::PageVisible);
        assert_eq!(container.inner_html(), "");
        assert_eq!(app.mount_count(), 2);
        assert_eq!(face(&doc).inner_html(), "<div>hello</div>");
        assert_eq!(app.current_props(), Some(Props::new().with("message", "hello")));
    }

    #[test]
    fn test_dropping_app_releases_bindings_and_subscriptions() {
        let doc = setup();
        let app = App::new(RouteTable::new().route::<Plain>("/"), vec![], &doc).unwrap();
        app.navigate("/", Props::new());
        let navigator = app.navigator();

        drop(app);

        assert_eq!(hub::subscriber_count(), (0, 0));
        assert_eq!(face(&doc).listener_count(crate::dom::EventKind::Click), 0);
        assert!(!navigator.is_attached());
        // Navigating through a detached handle is a no-op.
        navigator.navigate("/", Props::new());
        doc.body().key_up(KeyEvent::new(32));
    }
}
