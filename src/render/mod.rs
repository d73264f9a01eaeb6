//! Force-layout renderer: data contract, position retention and events
//!
//! The renderer owns a disposable copy of the graph (a structural clone of
//! [`GraphData`]) and augments it with simulation fields the physics loop
//! mutates on every tick. It never touches the authoritative model:
//! interactions are reported as events the host feeds back into the
//! explorer, and mutations flow only through the explorer.

mod simulation;

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::graph::{GraphData, PaginationInfo};
use simulation::SimulationParams;

/// Which neighbor page to load for a node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction {
    FirstPage,
    PreviousPage,
    NextPage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadMoreDataAction {
    pub node_id: String,
    pub page_action: PageAction,
}

/// Interaction events reported back to the host
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    /// A node was highlighted (`Some(id)`) or deselected (`None`)
    HighlightedNode(Option<String>),
    /// User requested another page of a node's neighbors
    LoadMoreData(LoadMoreDataAction),
    /// The renderer ingested a new graph copy
    GraphUpdated(u64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IconSpec {
    pub data: String,
    pub format: String,
}

/// Style configuration shared by the explorer and the renderer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphStyleConfig {
    /// Property used as the node caption
    pub node_caption: String,
    /// Property whose distinct values drive node coloring
    pub node_color_key: Option<String>,
    /// Property mapped through `icons_map` to a node icon
    pub node_icon_key: Option<String>,
    pub icons_map: HashMap<String, IconSpec>,
    pub link_color: String,
    pub link_width: f32,
    /// Show the edge label on neighbor lists
    pub show_neighbor_type: bool,
}

impl Default for GraphStyleConfig {
    fn default() -> Self {
        GraphStyleConfig {
            node_caption: "id".to_string(),
            node_color_key: None,
            node_icon_key: None,
            icons_map: HashMap::new(),
            link_color: "#aaa".to_string(),
            link_width: 1.0,
            show_neighbor_type: false,
        }
    }
}

/// A node in the renderer's copy of the graph, with simulation fields
#[derive(Clone, Debug)]
pub struct LayoutNode {
    pub id: String,
    pub caption: String,
    pub is_root: bool,
    pub fixed_position: bool,
    pub pagination: Option<PaginationInfo>,
    pub out_e_all_loaded: bool,
    pub in_e_all_loaded: bool,
    /// Index into the renderer's distinct color-value table
    pub color_index: Option<usize>,
    pub icon: Option<IconSpec>,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub fx: Option<f32>,
    pub fy: Option<f32>,
}

#[derive(Clone, Debug)]
pub struct LayoutLink {
    pub edge_id: String,
    pub source: usize,
    pub target: usize,
}

/// Neighbors-to-be-revealed gauge for a paginated node, in unit fractions
#[derive(Clone, Debug, PartialEq)]
pub struct PageGauge {
    pub offset_fraction: f32,
    pub width_fraction: f32,
    /// 1-based page range, e.g. `1-10`
    pub range_label: String,
    pub total_label: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        ZoomTransform { x: 0.0, y: 0.0, k: 1.0 }
    }
}

/// Force-directed renderer consuming structural clones of the graph.
///
/// Positions are preserved across updates by node id; the root is pinned to
/// the view center and new nodes enter on a ring around it before the
/// simulation takes over.
pub struct D3ForceGraph {
    width: f32,
    height: f32,
    config: GraphStyleConfig,
    nodes: Vec<LayoutNode>,
    links: Vec<LayoutLink>,
    unique_values: Vec<String>,
    selected_node_id: Option<String>,
    is_highlight_disabled: bool,
    zoom_transform: ZoomTransform,
    alpha: f32,
    update_counter: u64,
    events: VecDeque<GraphEvent>,
}

impl D3ForceGraph {
    const GRAPH_WIDTH_PX: f32 = 900.0;
    const GRAPH_HEIGHT_PX: f32 = 700.0;
    const NODE_LABEL_MAX_CHAR_LENGTH: usize = 16;
    const FORCE_COLLIDE_RADIUS: f32 = 40.0;
    const FORCE_COLLIDE_STRENGTH: f32 = 0.2;
    const FORCE_LINK_DISTANCE: f32 = 100.0;
    const FORCE_LINK_STRENGTH: f32 = 0.005;
    const FORCE_CHARGE_STRENGTH: f32 = -900.0;
    const INITIAL_POSITION_RADIUS: f32 = 150.0;
    const MAX_COLOR_NB: usize = 20;
    const ALPHA_DECAY: f32 = 0.0228;
    const ALPHA_MIN: f32 = 0.001;
    const VELOCITY_DECAY: f32 = 0.4;

    pub fn new(config: GraphStyleConfig) -> Self {
        D3ForceGraph {
            width: Self::GRAPH_WIDTH_PX,
            height: Self::GRAPH_HEIGHT_PX,
            config,
            nodes: Vec::new(),
            links: Vec::new(),
            unique_values: Vec::new(),
            selected_node_id: None,
            is_highlight_disabled: false,
            zoom_transform: ZoomTransform::default(),
            alpha: 0.0,
            update_counter: 0,
            events: VecDeque::new(),
        }
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[LayoutLink] {
        &self.links
    }

    pub fn config(&self) -> &GraphStyleConfig {
        &self.config
    }

    pub fn zoom_transform(&self) -> ZoomTransform {
        self.zoom_transform
    }

    pub fn view_center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Ingest a new graph copy. The copy is owned by the renderer until the
    /// next update; node positions carry over by id.
    pub fn update_graph(&mut self, graph: GraphData, config: Option<GraphStyleConfig>) {
        if let Some(config) = config {
            self.config = config;
        }
        self.is_highlight_disabled = true;
        self.selected_node_id = None;

        // Remember current positions before rebuilding
        let pos_map: HashMap<String, (f32, f32)> = self
            .nodes
            .iter()
            .map(|n| (n.id.clone(), (n.x, n.y)))
            .collect();

        self.update_unique_values(&graph);

        let (center_x, center_y) = self.view_center();
        let mut nodes = Vec::with_capacity(graph.vertices().len());
        for vertex in graph.vertices() {
            let caption = self.node_caption(vertex);
            let color_index = self.color_index_for(vertex);
            let icon = self.icon_for(vertex);

            let mut node = LayoutNode {
                id: vertex.id.clone(),
                caption,
                is_root: vertex.is_root,
                fixed_position: vertex.fixed_position,
                pagination: vertex.pagination.clone(),
                out_e_all_loaded: vertex.out_e_all_loaded,
                in_e_all_loaded: vertex.in_e_all_loaded,
                color_index,
                icon,
                x: center_x,
                y: center_y,
                vx: 0.0,
                vy: 0.0,
                fx: None,
                fy: None,
            };

            if node.fixed_position && pos_map.contains_key(&node.id) {
                let (x, y) = pos_map[&node.id];
                node.fx = Some(x);
                node.fy = Some(y);
                node.x = x;
                node.y = y;
            } else if node.is_root {
                node.fx = Some(center_x);
                node.fy = Some(center_y);
            } else if let Some(&(x, y)) = pos_map.get(&node.id) {
                node.x = x;
                node.y = y;
            }
            nodes.push(node);
        }

        // New non-fixed nodes start on a ring around the view center
        let entering: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| {
                !n.fixed_position && !n.is_root && n.x == center_x && n.y == center_y
            })
            .map(|(i, _)| i)
            .collect();
        for (slot, &index) in entering.iter().enumerate() {
            let angle = (slot as f32 * 0.618_034 + 0.37) * std::f32::consts::TAU;
            nodes[index].x = center_x + angle.cos() * Self::INITIAL_POSITION_RADIUS;
            nodes[index].y = center_y + angle.sin() * Self::INITIAL_POSITION_RADIUS;
        }

        let index_by_id: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        let mut links = Vec::with_capacity(graph.edges().len());
        for edge in graph.edges() {
            if let (Some(&source), Some(&target)) = (
                index_by_id.get(edge.out_v.as_str()),
                index_by_id.get(edge.in_v.as_str()),
            ) {
                links.push(LayoutLink {
                    edge_id: edge.id.clone(),
                    source,
                    target,
                });
            }
        }

        self.nodes = nodes;
        self.links = links;
        self.alpha = 1.0;
        self.is_highlight_disabled = false;
        self.update_counter += 1;
        self.events
            .push_back(GraphEvent::GraphUpdated(self.update_counter));
    }

    /// Replace the style configuration without re-ingesting the graph
    pub fn update_config(&mut self, config: GraphStyleConfig) {
        self.config = config;
    }

    /// Advance the simulation one tick. Returns false once settled.
    pub fn step(&mut self) -> bool {
        if self.alpha < Self::ALPHA_MIN {
            return false;
        }
        let params = SimulationParams {
            link_distance: Self::FORCE_LINK_DISTANCE,
            link_strength: Self::FORCE_LINK_STRENGTH,
            charge_strength: Self::FORCE_CHARGE_STRENGTH,
            collide_radius: Self::FORCE_COLLIDE_RADIUS,
            collide_strength: Self::FORCE_COLLIDE_STRENGTH,
            velocity_decay: Self::VELOCITY_DECAY,
        };
        let pairs: Vec<(usize, usize)> =
            self.links.iter().map(|l| (l.source, l.target)).collect();
        let moved = simulation::step(&mut self.nodes, &pairs, self.alpha, &params);
        self.alpha *= 1.0 - Self::ALPHA_DECAY;
        moved
    }

    /// Highlight a node by id (e.g. from a click or programmatic selection)
    pub fn select_node(&mut self, id: &str) {
        if self.is_highlight_disabled {
            return;
        }
        if !self.nodes.iter().any(|n| n.id == id) {
            return;
        }
        self.selected_node_id = Some(id.to_string());
        self.events
            .push_back(GraphEvent::HighlightedNode(Some(id.to_string())));
    }

    /// Clear the current highlight (click on the background)
    pub fn deselect_node(&mut self) {
        if self.selected_node_id.take().is_some() {
            self.events.push_back(GraphEvent::HighlightedNode(None));
        }
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    /// Disable highlight reporting while an editor pane owns the selection
    pub fn enable_highlight(&mut self, enable: bool) {
        self.is_highlight_disabled = !enable;
    }

    /// User asked for another page of a node's neighbors
    pub fn request_page(&mut self, node_id: &str, page_action: PageAction) {
        self.events.push_back(GraphEvent::LoadMoreData(LoadMoreDataAction {
            node_id: node_id.to_string(),
            page_action,
        }));
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_transform = ZoomTransform::default();
    }

    pub fn set_zoom(&mut self, transform: ZoomTransform) {
        self.zoom_transform = transform;
    }

    /// Drain pending interaction events for the host to dispatch
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        self.events.drain(..).collect()
    }

    /// The next-page control shows while either direction is not fully loaded
    pub fn next_page_visible(node: &LayoutNode) -> bool {
        !node.out_e_all_loaded || !node.in_e_all_loaded
    }

    /// The previous-page control hides only on a known first page
    pub fn previous_page_visible(node: &LayoutNode) -> bool {
        node.pagination
            .as_ref()
            .map_or(true, |p| p.current_page.start != 0)
    }

    /// Gauge marking which slice of a node's neighbors is on screen.
    /// Only available once the total is known.
    pub fn page_gauge(node: &LayoutNode) -> Option<PageGauge> {
        let pagination = node.pagination.as_ref()?;
        let total = pagination.total?;
        if total == 0 {
            return None;
        }
        let page = &pagination.current_page;
        Some(PageGauge {
            offset_fraction: page.start as f32 / total as f32,
            width_fraction: (page.end - page.start) as f32 / total as f32,
            // Zero-based internally, 1-based for display
            range_label: format!("{}-{}", page.start + 1, page.end),
            total_label: format!("total: {}", total),
        })
    }

    fn node_caption(&self, vertex: &crate::graph::GremlinVertex) -> String {
        let caption = vertex
            .prop_value(&self.config.node_caption)
            .map(|v| v.to_string())
            .unwrap_or_else(|| vertex.id.clone());
        caption.chars().take(Self::NODE_LABEL_MAX_CHAR_LENGTH).collect()
    }

    fn color_index_for(&self, vertex: &crate::graph::GremlinVertex) -> Option<usize> {
        let key = self.config.node_color_key.as_deref()?;
        let value = vertex.prop_value(key)?.to_string();
        self.unique_values.iter().position(|v| v == &value)
    }

    fn icon_for(&self, vertex: &crate::graph::GremlinVertex) -> Option<IconSpec> {
        let key = self.config.node_icon_key.as_deref()?;
        let value = vertex.prop_value(key)?.to_string();
        self.config.icons_map.get(&value).cloned()
    }

    /// Collect distinct values of the color key, capped to the palette size
    fn update_unique_values(&mut self, graph: &GraphData) {
        self.unique_values.clear();
        let Some(key) = self.config.node_color_key.clone() else {
            return;
        };
        for vertex in graph.vertices() {
            if let Some(value) = vertex.prop_value(&key) {
                let value = value.to_string();
                if !self.unique_values.contains(&value) {
                    if self.unique_values.len() >= Self::MAX_COLOR_NB {
                        break;
                    }
                    self.unique_values.push(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GremlinEdge, GremlinVertex, PageRange, PaginationInfo};

    fn graph_with(ids: &[&str], edges: &[(&str, &str, &str)]) -> GraphData {
        let mut g = GraphData::new();
        for id in ids {
            g.add_vertex(GremlinVertex::new(*id));
        }
        for (id, out_v, in_v) in edges {
            g.add_edge(GremlinEdge {
                id: (*id).into(),
                in_v: (*in_v).into(),
                out_v: (*out_v).into(),
                label: "knows".into(),
            });
        }
        g
    }

    #[test]
    fn test_positions_preserved_by_id_across_updates() {
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(graph_with(&["a", "b"], &[("e1", "a", "b")]), None);

        let moved = {
            let node = renderer
                .nodes
                .iter_mut()
                .find(|n| n.id == "b")
                .unwrap();
            node.x = 123.0;
            node.y = 45.0;
            (node.x, node.y)
        };

        renderer.update_graph(graph_with(&["a", "b", "c"], &[("e1", "a", "b")]), None);
        let b = renderer.nodes().iter().find(|n| n.id == "b").unwrap();
        assert_eq!((b.x, b.y), moved);
    }

    #[test]
    fn test_root_pinned_to_view_center() {
        let mut graph = graph_with(&["a", "b"], &[]);
        graph.set_as_root("a");
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(graph, None);

        let (cx, cy) = renderer.view_center();
        let a = renderer.nodes().iter().find(|n| n.id == "a").unwrap();
        assert_eq!(a.fx, Some(cx));
        assert_eq!(a.fy, Some(cy));
    }

    #[test]
    fn test_new_nodes_enter_on_ring() {
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(graph_with(&["a", "b", "c"], &[]), None);
        let (cx, cy) = renderer.view_center();
        for node in renderer.nodes() {
            let dx = node.x - cx;
            let dy = node.y - cy;
            let radius = (dx * dx + dy * dy).sqrt();
            assert!((radius - 150.0).abs() < 0.1, "node {} off ring: {}", node.id, radius);
        }
    }

    #[test]
    fn test_links_reference_node_indices() {
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(graph_with(&["a", "b"], &[("e1", "a", "b")]), None);
        assert_eq!(renderer.links().len(), 1);
        let link = &renderer.links()[0];
        assert_eq!(renderer.nodes()[link.source].id, "a");
        assert_eq!(renderer.nodes()[link.target].id, "b");
    }

    #[test]
    fn test_page_gauge_math() {
        let mut node_graph = graph_with(&["a"], &[]);
        node_graph.get_vertex_mut("a").unwrap().pagination = Some(PaginationInfo {
            total: Some(40),
            current_page: PageRange { start: 10, end: 20 },
        });
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(node_graph, None);

        let node = &renderer.nodes()[0];
        let gauge = D3ForceGraph::page_gauge(node).unwrap();
        assert_eq!(gauge.offset_fraction, 0.25);
        assert_eq!(gauge.width_fraction, 0.25);
        assert_eq!(gauge.range_label, "11-20");
        assert_eq!(gauge.total_label, "total: 40");
    }

    #[test]
    fn test_gauge_hidden_until_total_known() {
        let mut graph = graph_with(&["a"], &[]);
        graph.get_vertex_mut("a").unwrap().pagination = Some(PaginationInfo {
            total: None,
            current_page: PageRange { start: 0, end: 10 },
        });
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(graph, None);
        assert!(D3ForceGraph::page_gauge(&renderer.nodes()[0]).is_none());
    }

    #[test]
    fn test_page_button_visibility() {
        let mut graph = graph_with(&["a"], &[]);
        {
            let v = graph.get_vertex_mut("a").unwrap();
            v.pagination = Some(PaginationInfo {
                total: None,
                current_page: PageRange { start: 10, end: 20 },
            });
            v.out_e_all_loaded = true;
            v.in_e_all_loaded = false;
        }
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(graph, None);
        let node = &renderer.nodes()[0];
        assert!(D3ForceGraph::next_page_visible(node));
        assert!(D3ForceGraph::previous_page_visible(node));

        let mut done = node.clone();
        done.out_e_all_loaded = true;
        done.in_e_all_loaded = true;
        done.pagination = Some(PaginationInfo {
            total: Some(20),
            current_page: PageRange { start: 0, end: 10 },
        });
        assert!(!D3ForceGraph::next_page_visible(&done));
        assert!(!D3ForceGraph::previous_page_visible(&done));
    }

    #[test]
    fn test_events_reported_to_host() {
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(graph_with(&["a"], &[]), None);
        renderer.select_node("a");
        renderer.deselect_node();
        renderer.request_page("a", PageAction::NextPage);

        let events = renderer.drain_events();
        assert_eq!(
            events,
            vec![
                GraphEvent::GraphUpdated(1),
                GraphEvent::HighlightedNode(Some("a".to_string())),
                GraphEvent::HighlightedNode(None),
                GraphEvent::LoadMoreData(LoadMoreDataAction {
                    node_id: "a".to_string(),
                    page_action: PageAction::NextPage,
                }),
            ]
        );
        assert!(renderer.drain_events().is_empty());
    }

    #[test]
    fn test_simulation_settles() {
        let mut renderer = D3ForceGraph::new(GraphStyleConfig::default());
        renderer.update_graph(graph_with(&["a", "b", "c"], &[("e1", "a", "b")]), None);
        // Alpha decays below the floor within a bounded number of ticks
        for _ in 0..600 {
            renderer.step();
        }
        assert!(!renderer.step());
    }
}
