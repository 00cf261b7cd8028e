//! # Curriculum Graph
//!
//! The read-only directed acyclic graph of subjects and prerequisite edges.
//!
//! The graph is built once per catalog version, validated in full at
//! construction (cycle check included), and shared freely afterwards.
//! All data structures use `BTreeMap`/`BTreeSet` for deterministic ordering.

use crate::primitives::MAX_CATALOG_SUBJECTS;
use crate::{AcademicError, Prerequisite, Subject, SubjectCode, SubjectId};
use std::collections::{BTreeMap, BTreeSet};

/// The curriculum prerequisite graph.
///
/// Edges point from a subject to the subjects it requires. The edge set is
/// guaranteed acyclic: `build` rejects any catalog containing a cycle, so
/// every query on a constructed graph is bounded and total.
#[derive(Debug, Clone, Default)]
pub struct CurriculumGraph {
    /// Subject records: SubjectId -> Subject.
    subjects: BTreeMap<SubjectId, Subject>,

    /// Reverse lookup: SubjectCode -> SubjectId.
    code_index: BTreeMap<SubjectCode, SubjectId>,

    /// Adjacency: subject -> set of subjects it directly requires.
    requires: BTreeMap<SubjectId, BTreeSet<SubjectId>>,

    /// Reverse adjacency: subject -> set of subjects that require it.
    required_by: BTreeMap<SubjectId, BTreeSet<SubjectId>>,
}

impl CurriculumGraph {
    /// Build the graph from catalog data.
    ///
    /// Validation performed, in order:
    /// 1. catalog size cap and unique subject codes;
    /// 2. every edge endpoint resolves to a known subject;
    /// 3. no self-loops;
    /// 4. full cycle check (depth-first, explicit recursion path).
    ///
    /// Any violation fails the whole build; a cycle is reported as the
    /// ordered list of subject codes forming the loop, first code repeated
    /// at the end.
    pub fn build(subjects: &[Subject], edges: &[Prerequisite]) -> Result<Self, AcademicError> {
        if subjects.len() > MAX_CATALOG_SUBJECTS {
            return Err(AcademicError::InvalidCatalog(format!(
                "{} subjects exceeds the {} cap",
                subjects.len(),
                MAX_CATALOG_SUBJECTS
            )));
        }

        let mut graph = Self::default();

        for subject in subjects {
            if let Some(previous) = graph.code_index.insert(subject.code.clone(), subject.id) {
                if previous != subject.id {
                    return Err(AcademicError::DuplicateSubjectCode(subject.code.clone()));
                }
            }
            graph.subjects.insert(subject.id, subject.clone());
        }

        for edge in edges {
            if !graph.subjects.contains_key(&edge.subject) {
                return Err(AcademicError::UnknownSubject(edge.subject));
            }
            if !graph.subjects.contains_key(&edge.requires) {
                return Err(AcademicError::UnknownSubject(edge.requires));
            }
            if edge.subject == edge.requires {
                return Err(AcademicError::SelfPrerequisite(graph.code_of(edge.subject)));
            }
            graph
                .requires
                .entry(edge.subject)
                .or_default()
                .insert(edge.requires);
            graph
                .required_by
                .entry(edge.requires)
                .or_default()
                .insert(edge.subject);
        }

        if let Some(cycle) = graph.find_cycle() {
            let cycle = cycle.into_iter().map(|id| graph.code_of(id)).collect();
            return Err(AcademicError::CycleDetected { cycle });
        }

        Ok(graph)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Get the subjects a subject directly requires.
    pub fn direct_prerequisites_of(
        &self,
        subject: SubjectId,
    ) -> Result<BTreeSet<SubjectId>, AcademicError> {
        if !self.subjects.contains_key(&subject) {
            return Err(AcademicError::UnknownSubject(subject));
        }
        Ok(self.requires.get(&subject).cloned().unwrap_or_default())
    }

    /// Get the full transitive closure of a subject's prerequisites.
    ///
    /// Consistent with `direct_prerequisites_of` by construction: the
    /// closure is computed on demand by walking direct edges, which is
    /// bounded because the edge set is acyclic.
    pub fn all_prerequisites_of(
        &self,
        subject: SubjectId,
    ) -> Result<BTreeSet<SubjectId>, AcademicError> {
        if !self.subjects.contains_key(&subject) {
            return Err(AcademicError::UnknownSubject(subject));
        }

        let mut closure = BTreeSet::new();
        let mut pending = vec![subject];
        while let Some(current) = pending.pop() {
            for &next in self.requires.get(&current).into_iter().flatten() {
                if closure.insert(next) {
                    pending.push(next);
                }
            }
        }
        Ok(closure)
    }

    /// Topological order of the whole curriculum: prerequisites first,
    /// ties broken by ascending subject code.
    ///
    /// Used by curriculum-planning collaborators to lay out a program
    /// term by term.
    #[must_use]
    pub fn topological_order(&self) -> Vec<SubjectId> {
        // Kahn's algorithm with an ordered ready-set keyed by subject code.
        let mut remaining: BTreeMap<SubjectId, usize> = self
            .subjects
            .keys()
            .map(|&id| (id, self.requires.get(&id).map_or(0, BTreeSet::len)))
            .collect();

        let mut ready: BTreeSet<(SubjectCode, SubjectId)> = remaining
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&id, _)| (self.code_of(id), id))
            .collect();

        let mut order = Vec::with_capacity(self.subjects.len());
        while let Some(entry) = ready.pop_first() {
            let (_, id) = entry;
            order.push(id);

            for &dependent in self.required_by.get(&id).into_iter().flatten() {
                if let Some(count) = remaining.get_mut(&dependent) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert((self.code_of(dependent), dependent));
                    }
                }
            }
            remaining.remove(&id);
        }

        order
    }

    /// Lookup a subject record by identifier.
    #[must_use]
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    /// Lookup a subject record by catalog code.
    #[must_use]
    pub fn subject_by_code(&self, code: &str) -> Option<&Subject> {
        let id = self.code_index.get(&SubjectCode::new(code))?;
        self.subjects.get(id)
    }

    /// All subjects in ascending identifier order.
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }

    /// Check if the graph contains a subject.
    #[must_use]
    pub fn contains(&self, id: SubjectId) -> bool {
        self.subjects.contains_key(&id)
    }

    /// Total number of subjects.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Total number of prerequisite edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.requires.values().map(BTreeSet::len).sum()
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Code of a known subject. Falls back to the numeric identifier for
    /// ids that slipped past validation (unreachable on a built graph).
    fn code_of(&self, id: SubjectId) -> SubjectCode {
        self.subjects
            .get(&id)
            .map(|s| s.code.clone())
            .unwrap_or_else(|| SubjectCode::new(id.0.to_string()))
    }

    /// Find a cycle in the requirement edges, if any.
    ///
    /// Roots are visited in ascending subject-code order and neighbors in
    /// ascending identifier order, so the reported cycle is deterministic.
    fn find_cycle(&self) -> Option<Vec<SubjectId>> {
        let mut visiting = BTreeSet::new();
        let mut done = BTreeSet::new();
        let mut path = Vec::new();

        for &root in self.code_index.values() {
            if done.contains(&root) {
                continue;
            }
            if let Some(cycle) = self.cycle_dfs(root, &mut visiting, &mut done, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn cycle_dfs(
        &self,
        node: SubjectId,
        visiting: &mut BTreeSet<SubjectId>,
        done: &mut BTreeSet<SubjectId>,
        path: &mut Vec<SubjectId>,
    ) -> Option<Vec<SubjectId>> {
        visiting.insert(node);
        path.push(node);

        for &next in self.requires.get(&node).into_iter().flatten() {
            if done.contains(&next) {
                continue;
            }
            if visiting.contains(&next) {
                // Close the loop from the first occurrence of `next`.
                let start = path.iter().position(|&n| n == next)?;
                let mut cycle: Vec<SubjectId> = path[start..].to_vec();
                cycle.push(next);
                return Some(cycle);
            }
            if let Some(cycle) = self.cycle_dfs(next, visiting, done, path) {
                return Some(cycle);
            }
        }

        path.pop();
        visiting.remove(&node);
        done.insert(node);
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================
