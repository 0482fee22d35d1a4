use super::*;
use anyhow::anyhow;
use module_loader::{Block, LoadErrorKind, RenderFailure};
use shared::{
    domain::ModuleRef,
    protocol::{NoticeLevel, ViewPosition},
};

fn descriptor(id: &str, category: &str, activation: Activation) -> Descriptor {
    Descriptor {
        id: AppId::from(id),
        name: format!("{id} report"),
        description: format!("{id} description"),
        icon: "📊".into(),
        category: category.into(),
        activation,
        manages_own_navigation: false,
    }
}

fn embedded(module: &str) -> Activation {
    Activation::Embedded {
        module: ModuleRef::from(module),
    }
}

fn setup() -> Dispatcher {
    let mut self_nav = descriptor("ledger", "Finance", embedded("reports::ledger"));
    self_nav.manages_own_navigation = true;

    let registry = Registry::new(vec![
        descriptor("A", "Ops", embedded("reports::a")),
        descriptor(
            "B",
            "Ops",
            Activation::External {
                url: Some("http://x".parse().expect("url")),
            },
        ),
        descriptor("C", "Finance", embedded("reports::c")),
        descriptor("orphan", "Finance", Activation::External { url: None }),
        descriptor("ghost", "Labs", embedded("reports::ghost")),
        descriptor("flaky", "Labs", embedded("reports::flaky")),
        descriptor("crash", "Labs", embedded("reports::crash")),
        self_nav,
    ])
    .expect("registry");

    let mut modules = ModuleCatalog::new();
    modules
        .register_fn("reports::a", |page| {
            page.heading("A body");
            Ok(())
        })
        .register_fn("reports::c", |page| {
            page.text("C body");
            Ok(())
        })
        .register_fn("reports::flaky", |_page| Err(anyhow!("query timed out")))
        .register_fn("reports::crash", |_page| panic!("boom"))
        .register_fn("reports::ledger", |page| {
            page.text("ledger");
            Ok(())
        });

    Dispatcher::new(ShellContext {
        registry: Arc::new(registry),
        ui: Arc::new(UiSettings {
            cards_per_row: 2,
            ..UiSettings::default()
        }),
        modules: Arc::new(modules),
    })
}

fn select(dispatcher: &mut Dispatcher, id: &str) -> DispatchOutcome {
    dispatcher
        .dispatch(NavEvent::SelectApp {
            app_id: AppId::from(id),
        })
        .expect("dispatch")
}

fn catalog(page: RenderedPage) -> CatalogView {
    match page.body {
        PageBody::Catalog(view) => view,
        other => panic!("expected catalog, got {other:?}"),
    }
}

#[test]
fn new_session_starts_home_without_filter() {
    let dispatcher = setup();
    assert_eq!(dispatcher.state(), &ViewState::default());
    assert!(dispatcher.state().is_home());
    assert_eq!(dispatcher.state().filter_category(), None);
}

#[test]
fn selecting_embedded_app_opens_it_and_keeps_filter() {
    let mut dispatcher = setup();
    dispatcher
        .dispatch(NavEvent::SelectCategory {
            category: "Ops".into(),
        })
        .expect("filter");

    assert_eq!(select(&mut dispatcher, "A"), DispatchOutcome::Redraw);
    assert_eq!(
        dispatcher.state().position(),
        &Position::EmbeddedApp(AppId::from("A"))
    );
    assert_eq!(dispatcher.state().filter_category(), Some("Ops"));
}

#[test]
fn selecting_external_app_hands_off_without_changing_state() {
    let mut dispatcher = setup();
    let before = dispatcher.state().clone();

    let outcome = select(&mut dispatcher, "B");
    assert_eq!(
        outcome,
        DispatchOutcome::Handoff {
            app_id: AppId::from("B"),
            url: "http://x".parse().expect("url"),
        }
    );
    assert_eq!(dispatcher.state(), &before);
    assert_eq!(dispatcher.last_handoff(), Some(&AppId::from("B")));
}

#[test]
fn external_app_without_url_is_rejected_with_notice() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "A");
    let before = dispatcher.state().clone();

    let outcome = select(&mut dispatcher, "orphan");
    let DispatchOutcome::Rejected(notice) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "No URL configured for orphan report");
    assert_eq!(dispatcher.state(), &before);

    // repeated rejections never move the state
    select(&mut dispatcher, "orphan");
    assert_eq!(dispatcher.state(), &before);
}

#[test]
fn rejection_notices_are_shown_exactly_once() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "orphan");

    let first = dispatcher.render();
    assert_eq!(first.notices.len(), 1);
    assert_eq!(first.notices[0].message, "No URL configured for orphan report");

    let second = dispatcher.render();
    assert!(second.notices.is_empty());
}

#[test]
fn repeated_rejections_queue_a_single_notice() {
    let mut dispatcher = setup();
    for _ in 0..50 {
        select(&mut dispatcher, "orphan");
    }

    let page = dispatcher.render();
    assert_eq!(page.notices.len(), 1);
    assert_eq!(page.notices[0].message, "No URL configured for orphan report");
    assert!(dispatcher.render().notices.is_empty());
}

#[test]
fn unknown_app_is_a_hard_error() {
    let mut dispatcher = setup();
    let err = dispatcher
        .dispatch(NavEvent::SelectApp {
            app_id: AppId::from("nope"),
        })
        .expect_err("should fail");
    assert!(matches!(err, DispatchError::Registry(RegistryError::NotFound(_))));
    assert!(dispatcher.state().is_home());
}

#[test]
fn unknown_category_is_a_hard_error() {
    let mut dispatcher = setup();
    let err = dispatcher
        .dispatch(NavEvent::SelectCategory {
            category: "Marketing".into(),
        })
        .expect_err("should fail");
    assert!(matches!(err, DispatchError::UnknownCategory(c) if c == "Marketing"));
    assert_eq!(dispatcher.state().filter_category(), None);
}

#[test]
fn return_home_is_absorbing_from_every_state() {
    let setups: Vec<Vec<NavEvent>> = vec![
        vec![],
        vec![NavEvent::OpenAbout],
        vec![NavEvent::SelectApp {
            app_id: AppId::from("C"),
        }],
        vec![NavEvent::SelectCategory {
            category: "Finance".into(),
        }],
        vec![
            NavEvent::SelectCategory {
                category: "Ops".into(),
            },
            NavEvent::SelectApp {
                app_id: AppId::from("A"),
            },
        ],
    ];

    for events in setups {
        let mut dispatcher = setup();
        for event in events {
            dispatcher.dispatch(event).expect("setup event");
        }
        dispatcher.dispatch(NavEvent::ReturnHome).expect("home");
        assert_eq!(dispatcher.state(), &ViewState::default());
        dispatcher.dispatch(NavEvent::ReturnHome).expect("home again");
        assert_eq!(dispatcher.state(), &ViewState::default());
    }
}

#[test]
fn about_takes_precedence_and_is_exclusive_with_apps() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "A");
    dispatcher.dispatch(NavEvent::OpenAbout).expect("about");

    assert_eq!(dispatcher.state().current_app(), None);
    let page = dispatcher.render();
    assert!(matches!(page.body, PageBody::About { .. }));
    assert_eq!(
        page.navigation.map(|nav| nav.position),
        Some(ViewPosition::About)
    );
}

#[test]
fn embedded_app_renders_inside_chrome_header() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "A");

    let page = dispatcher.render();
    let PageBody::App { header, page: body } = page.body else {
        panic!("expected app body");
    };
    assert_eq!(header.name, "A report");
    assert_eq!(header.description, "A description");
    assert_eq!(header.icon, "📊");
    assert_eq!(
        body.blocks(),
        &[Block::Heading {
            level: 2,
            text: "A body".into()
        }]
    );
    assert!(page.navigation.is_some());
}

#[test]
fn self_navigating_app_suppresses_outer_navigation() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "ledger");
    let page = dispatcher.render();
    assert!(page.navigation.is_none());
    assert!(matches!(page.body, PageBody::App { .. }));

    dispatcher.dispatch(NavEvent::ReturnHome).expect("home");
    assert!(dispatcher.render().navigation.is_some());
}

#[test]
fn loader_failure_is_contained_and_names_the_app() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "ghost");
    let before = dispatcher.state().clone();

    let page = dispatcher.render();
    let PageBody::AppFailed { header, failure } = page.body else {
        panic!("expected failure body");
    };
    assert_eq!(header.name, "ghost report");
    assert!(matches!(
        &failure,
        AppFailure::Load(err) if err.kind == LoadErrorKind::ResolutionFailed
            && err.detail.as_str() == "reports::ghost"
    ));
    assert_eq!(
        failure.headline(&header.name),
        "Could not load application: ghost report"
    );
    assert!(failure.hint().contains("reports::ghost"));
    assert_eq!(dispatcher.state(), &before);

    // the user can still navigate away
    dispatcher.dispatch(NavEvent::ReturnHome).expect("home");
    assert!(matches!(dispatcher.render().body, PageBody::Catalog(_)));
}

#[test]
fn render_failure_is_contained() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "flaky");

    let page = dispatcher.render();
    let PageBody::AppFailed { header, failure } = page.body else {
        panic!("expected failure body");
    };
    assert_eq!(
        failure,
        AppFailure::Render(RenderFailure::Error("query timed out".into()))
    );
    assert_eq!(
        failure.headline(&header.name),
        "Error running flaky report: query timed out"
    );
}

#[test]
fn panicking_unit_is_contained_and_names_the_app() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "crash");
    let before = dispatcher.state().clone();

    let page = dispatcher.render();
    assert!(page.navigation.is_some());
    let PageBody::AppFailed { header, failure } = page.body else {
        panic!("expected failure body");
    };
    assert!(matches!(
        &failure,
        AppFailure::Render(RenderFailure::Panic(message)) if message == "boom"
    ));
    assert_eq!(
        failure.headline(&header.name),
        "Error running crash report: panicked: boom"
    );
    assert_eq!(dispatcher.state(), &before);

    dispatcher.dispatch(NavEvent::ReturnHome).expect("home");
    assert!(dispatcher.state().is_home());
    assert!(matches!(dispatcher.render().body, PageBody::Catalog(_)));
}

#[test]
fn home_catalog_is_grouped_and_tiled() {
    let mut dispatcher = setup();
    let view = catalog(dispatcher.render());

    assert!(!view.show_clear_filter);
    let categories: Vec<&str> = view.sections.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(categories, vec!["Ops", "Finance", "Labs"]);

    let finance = &view.sections[1];
    let rows: Vec<Vec<&str>> = finance
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.app_id.as_str()).collect())
        .collect();
    assert_eq!(rows, vec![vec!["C", "orphan"], vec!["ledger"]]);
}

#[test]
fn category_filter_restricts_catalog_and_offers_clear() {
    let mut dispatcher = setup();
    dispatcher
        .dispatch(NavEvent::SelectCategory {
            category: "Labs".into(),
        })
        .expect("filter");

    let view = catalog(dispatcher.render());
    assert!(view.show_clear_filter);
    assert_eq!(view.filter.as_deref(), Some("Labs"));
    let ids: Vec<&str> = view.app_ids().into_iter().map(AppId::as_str).collect();
    assert_eq!(ids, vec!["ghost", "flaky", "crash"]);

    dispatcher
        .dispatch(NavEvent::ClearCategoryFilter)
        .expect("clear");
    let view = catalog(dispatcher.render());
    assert!(!view.show_clear_filter);
    assert_eq!(view.app_ids().len(), 8);
}

#[test]
fn selecting_category_from_an_app_returns_home() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "A");
    dispatcher
        .dispatch(NavEvent::SelectCategory {
            category: "Finance".into(),
        })
        .expect("filter");
    assert!(dispatcher.state().is_home());
    assert_eq!(dispatcher.state().filter_category(), Some("Finance"));
}

#[test]
fn snapshot_reflects_position_filter_and_handoff() {
    let mut dispatcher = setup();
    select(&mut dispatcher, "B");
    select(&mut dispatcher, "C");

    let snapshot = dispatcher.snapshot();
    assert_eq!(snapshot.position, ViewPosition::EmbeddedApp);
    assert_eq!(snapshot.current_app, Some(AppId::from("C")));
    assert_eq!(snapshot.filter_category, None);
    assert_eq!(snapshot.last_handoff, Some(AppId::from("B")));
}
