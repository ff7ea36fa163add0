//! Built-in catalog, assembled from an explicit table of event constructors.

use crate::catalog::Catalog;
use crate::model::{Event, EventShape, Notice, Priority, SubEvent, TaskOverrides, TaskTemplate};

pub const DAILY_EVENT_ID: &str = "daily";
pub const DAILY_EVENT_NAME: &str = "Daily Tasks";

type EventConstructor = fn() -> Event;

const EVENT_REGISTRY: &[EventConstructor] = &[
    server_reset_prep,
    lost_kingdom,
    beast_hunt,
    cesares_fury,
];

pub fn builtin_catalog() -> Catalog {
    Catalog::new(
        daily_tasks(),
        EVENT_REGISTRY.iter().map(|build| build()).collect(),
    )
}

fn hunt_beasts() -> TaskTemplate {
    TaskTemplate::new("hunt-beasts", "Defeat ${count} Beasts")
        .with_description("Rewards at ${count} beasts.")
        .with_category("combat")
        .with_priority(Priority::Medium)
        .with_count(10)
}

fn gather_resources() -> TaskTemplate {
    TaskTemplate::new("gather-resources", "Gather ${count} Resources")
        .with_description("${remaining} resources left to gather.")
        .with_category("resources")
        .with_count(1_000_000)
}

fn epic_recruitment() -> TaskTemplate {
    TaskTemplate::new("epic-recruitment", "Recruit ${count} Epic Heroes")
        .with_description("Gold keys. ${progress}% recruited.")
        .with_category("heroes")
        .with_priority(Priority::High)
        .with_count(10)
        .implying(["advanced-recruitment"])
}

fn notice(id: &str, message: &str, priority: Priority) -> Notice {
    Notice {
        id: id.to_string(),
        message: message.to_string(),
        notice_type: "preparation".to_string(),
        priority,
    }
}

fn daily_tasks() -> Vec<TaskTemplate> {
    vec![
        TaskTemplate::new("daily-login", "Daily Login")
            .with_description("Claim the daily login reward")
            .with_category("daily")
            .with_priority(Priority::Low),
        TaskTemplate::new("arena-challenges", "${count} Arena Battles")
            .with_description("Participate in ${count} arena battles")
            .with_category("combat")
            .with_priority(Priority::High)
            .with_count(5),
        TaskTemplate::new("alliance-help", "Help Alliance Members ${count} Times")
            .with_category("alliance")
            .with_count(30),
        TaskTemplate::new("advanced-recruitment", "Recruit ${count} Heroes")
            .with_description("Silver keys")
            .with_category("heroes")
            .with_count(5),
        hunt_beasts(),
    ]
}

fn server_reset_prep() -> Event {
    Event {
        id: "server-reset-prep".to_string(),
        name: "Server Reset Preparation".to_string(),
        description: "Tasks to prepare for server reset".to_string(),
        notices: vec![
            notice(
                "save-intel-notice",
                "Save Intel Missions for server reset",
                Priority::High,
            ),
            notice(
                "gatherer-timing",
                "Send out gatherers so they return after server reset",
                Priority::Medium,
            ),
        ],
        shape: EventShape::Flat {
            tasks: vec![
                TaskTemplate::new("save-intel-missions", "Save Intel Missions")
                    .with_category("preparation")
                    .with_priority(Priority::High),
                TaskTemplate::new("send-gatherers", "Send Out Gatherers")
                    .with_category("preparation"),
            ],
        },
    }
}

fn lost_kingdom() -> Event {
    Event {
        id: "lost-kingdom".to_string(),
        name: "Lost Kingdom".to_string(),
        description: "Multi-day Lost Kingdom event with different phases".to_string(),
        notices: Vec::new(),
        shape: EventShape::MultiDay {
            duration: None,
            sub_events: vec![
                SubEvent {
                    id: "lk-day-1".to_string(),
                    name: "LK Day 1: Preparation".to_string(),
                    description: "First day preparation phase".to_string(),
                    day: 1,
                    notices: vec![notice(
                        "lk-prep-notice",
                        "Prepare troops and resources for Lost Kingdom",
                        Priority::High,
                    )],
                    tasks: vec![
                        hunt_beasts().with_overrides(TaskOverrides::count(15)),
                        gather_resources().with_overrides(TaskOverrides::count(10_000_000)),
                    ],
                },
                SubEvent {
                    id: "lk-day-2".to_string(),
                    name: "LK Day 2: Combat Phase".to_string(),
                    description: "Second day combat phase".to_string(),
                    day: 2,
                    notices: Vec::new(),
                    tasks: vec![
                        hunt_beasts().with_overrides(TaskOverrides {
                            count: Some(25),
                            priority: Some(Priority::High),
                            ..TaskOverrides::default()
                        }),
                        epic_recruitment().with_overrides(TaskOverrides::count(30)),
                    ],
                },
                SubEvent {
                    id: "lk-day-3".to_string(),
                    name: "LK Day 3: Resource Phase".to_string(),
                    description: "Third day resource gathering phase".to_string(),
                    day: 3,
                    notices: Vec::new(),
                    tasks: vec![gather_resources().with_overrides(TaskOverrides {
                        count: Some(50_000_000),
                        priority: Some(Priority::High),
                        ..TaskOverrides::default()
                    })],
                },
            ],
        },
    }
}

fn beast_hunt() -> Event {
    Event {
        id: "beast-hunt-event".to_string(),
        name: "Beast Hunt Event".to_string(),
        description: "Special beast hunting event".to_string(),
        notices: Vec::new(),
        shape: EventShape::Flat {
            tasks: vec![
                hunt_beasts().with_overrides(TaskOverrides {
                    name: Some("Hunt ${count} Beasts".to_string()),
                    count: Some(15),
                    priority: Some(Priority::High),
                    ..TaskOverrides::default()
                }),
                TaskTemplate::new("beast-materials", "Collect Beast Materials")
                    .with_category("resources"),
            ],
        },
    }
}

fn cesares_fury() -> Event {
    Event {
        id: "cesares-fury-event".to_string(),
        name: "Cesares Fury".to_string(),
        description: "Special Cesares Fury event".to_string(),
        notices: Vec::new(),
        shape: EventShape::Durational {
            duration: 3,
            tasks: vec![
                TaskTemplate::new("cesares-fury", "Attack ${count} Cesares Fury")
                    .with_category("combat")
                    .with_priority(Priority::High)
                    .with_count(50)
                    .with_points(1_000)
                    .accumulating(),
            ],
        },
    }
}
