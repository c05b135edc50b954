//! The level: an arena of areas, the portals between them and the BSP used
//! to find the area a point lies in.

use crate::{
    data_structures::area::{AreaId, Frame, ModelArea, Portal},
    error::{Result, ViewerError},
    gfx::{GraphicsBackend, ShaderProgram},
    math::Vector3,
    proc::{ProcLexer, Token, TokenStream},
    resources::{TextureProvider, load_string},
};

const HEADER: &str = "mapProcFile003";
const AREA_PREFIX: &str = "_area";
/// Upper bound on areas per level. Counts and `_areaN` indices past it are rejected.
pub const MAX_AREAS: usize = 1 << 16;

/// Which areas a frame draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Every area, in arena order.
    #[default]
    AllAreas,
    /// Only the areas reachable through portals from the camera's area.
    PortalFlood,
}

/// A BSP split plane. Points with `normal · p + dist > 0` go to `children[0]`.
///
/// A child `> 0` is a node index, `0` is solid space and `< 0` encodes the
/// area `-1 - child`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub normal: Vector3,
    pub dist: f32,
    pub children: [i32; 2],
}

#[derive(Debug, Default)]
pub struct Scene {
    areas: Vec<ModelArea>,
    inline_models: Vec<ModelArea>,
    nodes: Vec<Node>,
    frame: Frame,
    traversal: Traversal,
}

impl Scene {
    /// Reads a level from the `assets` directory.
    pub async fn load(
        file_name: &str,
        textures: &mut dyn TextureProvider,
        gfx: &mut dyn GraphicsBackend,
    ) -> Result<Self> {
        let text = load_string(file_name)
            .await
            .map_err(|e| ViewerError::resolution(file_name, format!("{e:#}")))?;
        log::info!("Loading level {}", file_name);
        Self::parse(&text, textures, gfx)
    }

    /// Builds a scene from `.proc` text. Nothing stays uploaded if this fails.
    pub fn parse(
        text: &str,
        textures: &mut dyn TextureProvider,
        gfx: &mut dyn GraphicsBackend,
    ) -> Result<Self> {
        let mut lexer = ProcLexer::new(text);
        let mut scene = Self::default();
        match scene.parse_sections(&mut lexer, textures, gfx) {
            Ok(()) => {
                log::debug!(
                    "Level has {} areas, {} inline models, {} nodes",
                    scene.areas.len(),
                    scene.inline_models.len(),
                    scene.nodes.len()
                );
                Ok(scene)
            }
            Err(e) => {
                scene.release(gfx);
                Err(e)
            }
        }
    }

    fn parse_sections(
        &mut self,
        lexer: &mut ProcLexer<'_>,
        textures: &mut dyn TextureProvider,
        gfx: &mut dyn GraphicsBackend,
    ) -> Result<()> {
        match lexer.next_token()? {
            Some(Token::Word(header)) if header.starts_with("mapProcFile") => {
                if header != HEADER {
                    log::warn!("Unexpected level version {}, reading as {}", header, HEADER);
                }
            }
            _ => return Err(lexer.error("missing mapProcFile header")),
        }

        while let Some(token) = lexer.next_token()? {
            let section = match token {
                Token::Word(section) => section,
                other => {
                    return Err(lexer.error(format!("expected a section name, found {other:?}")));
                }
            };
            match section.as_str() {
                "model" => self.parse_model(lexer, textures, gfx)?,
                "interAreaPortals" => self.parse_portals(lexer)?,
                "nodes" => self.parse_nodes(lexer)?,
                "shadowModel" => lexer.skip_block()?,
                other => {
                    log::warn!("Skipping unknown section {} at line {}", other, lexer.line());
                    lexer.skip_block()?;
                }
            }
        }
        Ok(())
    }

    fn parse_model(
        &mut self,
        lexer: &mut ProcLexer<'_>,
        textures: &mut dyn TextureProvider,
        gfx: &mut dyn GraphicsBackend,
    ) -> Result<()> {
        lexer.expect_punct('{')?;
        let name = lexer.next_string()?;

        match area_index(&name) {
            Some(index) => {
                if index >= MAX_AREAS {
                    return Err(lexer.error(format!(
                        "area {name} exceeds the limit of {MAX_AREAS} areas"
                    )));
                }
                self.ensure_areas(index + 1);
                self.areas[index].load(lexer, textures, gfx)?;
            }
            None => {
                let mut model = ModelArea::new(name);
                model.load(lexer, textures, gfx)?;
                self.inline_models.push(model);
            }
        }
        close_blocks(lexer)
    }

    fn parse_portals(&mut self, lexer: &mut ProcLexer<'_>) -> Result<()> {
        lexer.expect_punct('{')?;
        let num_areas = lexer.next_count("area count")?;
        let num_portals = lexer.next_count("portal count")?;
        if num_areas > MAX_AREAS {
            return Err(lexer.error(format!(
                "{num_areas} areas exceed the limit of {MAX_AREAS}"
            )));
        }
        self.ensure_areas(num_areas);

        for _ in 0..num_portals {
            let num_points = lexer.next_count("portal point count")?;
            let positive = lexer.next_int()?;
            let negative = lexer.next_int()?;
            let mut winding = Vec::new();
            for _ in 0..num_points {
                lexer.expect_punct('(')?;
                let x = lexer.next_float()?;
                let y = lexer.next_float()?;
                let z = lexer.next_float()?;
                lexer.expect_punct(')')?;
                winding.push(Vector3::new(x, y, z));
            }

            let positive = self.portal_area(lexer, positive)?;
            let negative = self.portal_area(lexer, negative)?;
            let reversed = winding.iter().rev().copied().collect();
            self.areas[positive.0].add_portal(Portal::new(negative, winding));
            self.areas[negative.0].add_portal(Portal::new(positive, reversed));
        }
        close_blocks(lexer)
    }

    fn portal_area(&self, lexer: &ProcLexer<'_>, index: i32) -> Result<AreaId> {
        match usize::try_from(index) {
            Ok(index) if index < self.areas.len() => Ok(AreaId(index)),
            _ => Err(lexer.error(format!(
                "portal area {index} out of range for {} areas",
                self.areas.len()
            ))),
        }
    }

    fn parse_nodes(&mut self, lexer: &mut ProcLexer<'_>) -> Result<()> {
        lexer.expect_punct('{')?;
        let num_nodes = lexer.next_count("node count")?;
        let mut nodes = Vec::new();
        for _ in 0..num_nodes {
            let a = lexer.next_float()?;
            let b = lexer.next_float()?;
            let c = lexer.next_float()?;
            let d = lexer.next_float()?;
            let positive = lexer.next_int()?;
            let negative = lexer.next_int()?;
            for child in [positive, negative] {
                if child > 0 && child as usize >= num_nodes {
                    return Err(lexer.error(format!(
                        "node child {child} out of range for {num_nodes} nodes"
                    )));
                }
            }
            nodes.push(Node {
                normal: Vector3::new(a, b, c),
                dist: d,
                children: [positive, negative],
            });
        }
        self.nodes = nodes;
        close_blocks(lexer)
    }

    fn ensure_areas(&mut self, count: usize) {
        while self.areas.len() < count {
            let name = format!("{AREA_PREFIX}{}", self.areas.len());
            self.areas.push(ModelArea::new(name));
        }
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    pub fn set_traversal(&mut self, traversal: Traversal) {
        self.traversal = traversal;
    }

    pub fn area(&self, id: AreaId) -> Option<&ModelArea> {
        self.areas.get(id.0)
    }

    pub fn areas(&self) -> &[ModelArea] {
        &self.areas
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn inline_models(&self) -> &[ModelArea] {
        &self.inline_models
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The area containing `point`, or `None` in solid space or without a BSP.
    pub fn area_at(&self, point: Vector3) -> Option<AreaId> {
        let mut index = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(index)?;
            let side = if node.normal.dot(point) + node.dist > 0.0 { 0 } else { 1 };
            let child = node.children[side];
            if child > 0 {
                index = child as usize;
                continue;
            }
            if child == 0 {
                return None;
            }
            let area = (-1 - child) as usize;
            return (area < self.areas.len()).then_some(AreaId(area));
        }
        None
    }

    pub fn current_frame(&self) -> Frame {
        self.frame
    }

    /// Starts a new frame. Every area counts as unrendered again.
    pub fn begin_frame(&mut self) -> Frame {
        self.frame = self.frame.next();
        self.frame
    }

    pub fn reset_all(&mut self) {
        for area in self.areas.iter_mut().chain(self.inline_models.iter_mut()) {
            area.reset();
        }
    }

    /// Draws the current frame from `eye`. Returns how many areas drew.
    pub fn render(&mut self, eye: Vector3, gfx: &mut dyn GraphicsBackend) -> usize {
        let frame = self.frame;
        let drawn = match self.traversal {
            Traversal::AllAreas => self.render_all(frame, gfx),
            Traversal::PortalFlood => match self.area_at(eye) {
                Some(start) => self.flood(start, frame, gfx),
                None => {
                    log::debug!("Eye {:?} is outside every area, drawing all", eye);
                    self.render_all(frame, gfx)
                }
            },
        };
        for model in &mut self.inline_models {
            model.render(frame, gfx);
        }
        drawn
    }

    fn render_all(&mut self, frame: Frame, gfx: &mut dyn GraphicsBackend) -> usize {
        self.areas
            .iter_mut()
            .filter_map(|area| area.render(frame, gfx).then_some(()))
            .count()
    }

    fn flood(&mut self, start: AreaId, frame: Frame, gfx: &mut dyn GraphicsBackend) -> usize {
        let mut drawn = 0;
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            let Some(area) = self.areas.get_mut(id.0) else {
                continue;
            };
            // Already drawn this frame means already visited.
            if area.render(frame, gfx) {
                drawn += 1;
                pending.extend(area.portals().iter().map(|portal| portal.target));
            }
        }
        drawn
    }

    pub fn bind_program(&mut self, program: &ShaderProgram, gfx: &mut dyn GraphicsBackend) {
        for area in self.areas.iter_mut().chain(self.inline_models.iter_mut()) {
            area.bind_program(program, gfx);
        }
    }

    /// Deletes every GPU buffer of the level. Safe to call more than once.
    pub fn release(&mut self, gfx: &mut dyn GraphicsBackend) {
        for area in self.areas.iter_mut().chain(self.inline_models.iter_mut()) {
            area.release(gfx);
        }
    }
}

/// `_areaN` names map to arena slot `N`.
fn area_index(name: &str) -> Option<usize> {
    name.strip_prefix(AREA_PREFIX)?.parse().ok()
}

/// Consumes the closing braces left after a section body, at least one.
fn close_blocks(lexer: &mut ProcLexer<'_>) -> Result<()> {
    lexer.expect_punct('}')?;
    while matches!(lexer.peek_token()?, Some(Token::Punct('}'))) {
        lexer.next_token()?;
    }
    Ok(())
}
