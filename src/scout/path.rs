//! Army-conserving breadth-first pathfinding.
//!
//! The search tracks how strong the attacking force would be on arrival at
//! each tile: friendly tiles add their army (minus the one left behind),
//! hostile or neutral tiles cost their army plus one to take. A tile only
//! joins the frontier if the force could still capture it, so the first path
//! found is the shortest one that keeps the attack alive.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::board::{Coord, Grid};

/// Per-search scratch space, indexed like the board's tile array.
#[derive(Debug)]
struct SearchArena {
    visited: Vec<bool>,
    came_from: Vec<Option<usize>>,
    army_count: Vec<i64>,
}

impl SearchArena {
    fn new(size: usize) -> Self {
        Self {
            visited: vec![false; size],
            came_from: vec![None; size],
            army_count: vec![0; size],
        }
    }

    fn visit(&mut self, idx: usize, from: Option<usize>, army: i64) {
        self.visited[idx] = true;
        self.came_from[idx] = from;
        self.army_count[idx] = army;
    }

    /// Walk predecessors back from `dest` and return the chain start-first.
    ///
    /// A missing link simply ends the chain.
    fn reconstruct(&self, dest: usize) -> Vec<usize> {
        let mut chain = vec![dest];
        let mut current = dest;
        while let Some(prev) = self.came_from[current] {
            if chain.len() > self.came_from.len() {
                break;
            }
            chain.push(prev);
            current = prev;
        }
        chain.reverse();
        chain
    }
}

impl Grid {
    /// Path from `from` to `dest` that the army standing on `from` can
    /// actually capture, both ends included.
    ///
    /// Cities are avoided unless no path exists without them. An empty path
    /// means no feasible attack; `None` as destination yields one right away.
    #[must_use]
    pub fn path_to(&self, from: Coord, dest: Option<Coord>) -> Vec<Coord> {
        self.path_to_with(from, dest, false)
    }

    /// [`Grid::path_to`], optionally allowing cities from the first pass.
    #[must_use]
    pub fn path_to_with(&self, from: Coord, dest: Option<Coord>, include_cities: bool) -> Vec<Coord> {
        let Some(dest) = dest else {
            return Vec::new();
        };

        let path = self.search(from, dest, include_cities);
        if !path.is_empty() || include_cities {
            return path;
        }
        debug!(%from, %dest, "no path around cities, retrying through them");
        self.search(from, dest, true)
    }

    /// Single breadth-first pass of [`Grid::path_to`].
    ///
    /// Swamps are always traversable; cities only with `include_cities`.
    #[must_use]
    pub fn search(&self, from: Coord, dest: Coord, include_cities: bool) -> Vec<Coord> {
        let (Some(start), Some(goal)) = (self.index_of(from), self.index_of(dest)) else {
            return Vec::new();
        };

        let tiles = self.tiles();
        let mut arena = SearchArena::new(tiles.len());
        arena.visit(start, None, i64::from(tiles[start].army()));
        let mut frontier = VecDeque::from([start]);

        while let Some(current) = frontier.pop_front() {
            if current == goal {
                break;
            }

            let strength = arena.army_count[current];
            for next in self.neighbor_tiles(tiles[current].coord(), true, include_cities) {
                let Some(idx) = self.index_of(next.coord()) else {
                    continue;
                };
                if arena.visited[idx] {
                    continue;
                }

                // The destination is held to the same rule: it stays unvisited
                // until a strong enough predecessor reaches it.
                let on_team = self.is_on_team(next.coord());
                let army = i64::from(next.army());
                if !(on_team || army < strength) {
                    continue;
                }

                let remaining = if on_team {
                    strength + (army - 1)
                } else {
                    strength - (army + 1)
                };
                arena.visit(idx, Some(current), remaining);
                frontier.push_back(idx);
            }
        }

        if !arena.visited[goal] {
            trace!(%from, %dest, include_cities, "destination unreachable");
            return Vec::new();
        }

        arena
            .reconstruct(goal)
            .into_iter()
            .map(|idx| tiles[idx].coord())
            .collect()
    }
}
