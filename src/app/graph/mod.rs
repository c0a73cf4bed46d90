mod build;
mod interaction;
mod render;
mod view;

pub(in crate::app) use build::{JobReceiver, LaidOutTopology, Topology, TopologyJob, spawn_topology_job};
pub(in crate::app) use interaction::{InteractionController, Selection};
pub(in crate::app) use render::FrameStats;
