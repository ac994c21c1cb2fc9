use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use string_builder::Builder;
use thiserror::Error;

use crate::bridge::token::Keywords;
use crate::util::bridge_log::{self, LogSources, LogTypes};

// Enum for determining the type of a variable in a symbol table
#[derive (Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum (serialize_all = "lowercase")]
pub enum Type {
    Int,
    Double,
    Boolean,
    Char,
    #[strum (serialize = "String")]
    String
}

impl Type {
    // The type named by a type keyword, if it is one
    pub fn from_keyword(keyword: Keywords) -> Option<Type> {
        return match keyword {
            Keywords::Int => Some(Type::Int),
            Keywords::Double => Some(Type::Double),
            Keywords::Boolean => Some(Type::Boolean),
            Keywords::Char => Some(Type::Char),
            Keywords::String => Some(Type::String),
            _ => None
        };
    }
}

// The fields of an entry that can be flipped after declaration
#[derive (Debug, Clone, Copy, PartialEq)]
pub enum SymbolTableEntryField {
    Used
}

#[derive (Debug, Clone, PartialEq)]
pub struct SymbolTableEntry {
    pub name: String,
    pub symbol_type: Type,
    // Where the identifier was declared
    pub position: (usize, usize),
    // The scope the identifier belongs to
    pub scope: usize,
    pub is_used: bool
}

#[derive (Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolTableError {
    #[error ("variable '{name}' has already been declared in this scope (line {first_line})")]
    DuplicateName { name: String, first_line: usize },
    #[error ("variable '{name}' has not been declared")]
    NotFound { name: String }
}

#[derive (Debug)]
pub struct SymbolTable {
    // Scopes are nodes in the graph, each with an edge to its parent scope
    graph: Graph<HashMap<String, SymbolTableEntry>, ()>,

    // The index of the node of the current scope
    cur_scope: usize
}

impl SymbolTable {
    // Constructor for a new symbol table, which starts in the root scope
    pub fn new() -> Self {
        let mut graph: Graph<HashMap<String, SymbolTableEntry>, ()> = Graph::new();
        let root: NodeIndex = graph.add_node(HashMap::new());

        return SymbolTable {
            graph,
            cur_scope: root.index()
        };
    }

    pub fn current_scope(&self) -> usize {
        return self.cur_scope;
    }

    // Total number of scopes ever opened, abandoned ones included
    pub fn scope_count(&self) -> usize {
        return self.graph.node_count();
    }

    // Function to create a new scope and set it as the current scope
    pub fn new_scope(&mut self) -> usize {
        // Add a new node to the graph with the new hashmap
        let new_node: NodeIndex = self.graph.add_node(HashMap::new());

        // Create the edge from the new scope to the parent
        self.graph.add_edge(new_node, NodeIndex::new(self.cur_scope), ());

        bridge_log::log(
            LogTypes::Debug,
            LogSources::SymbolTable,
            format!("Entering new scope {} (parent {})", new_node.index(), self.cur_scope)
        );

        // Update the current scope to be the new scope
        self.cur_scope = new_node.index();
        return self.cur_scope;
    }

    // Called to end the current scope. The scope stays in the graph but is
    // never consulted again; the root scope is never left.
    pub fn end_cur_scope(&mut self) {
        if let Some(parent) = self.parent_of(self.cur_scope) {
            bridge_log::log(
                LogTypes::Debug,
                LogSources::SymbolTable,
                format!("Exiting scope {}", self.cur_scope)
            );
            self.cur_scope = parent;
        }
    }

    fn parent_of(&self, scope: usize) -> Option<usize> {
        return self.graph
            .neighbors(NodeIndex::new(scope))
            .next()
            .map(|parent| parent.index());
    }

    // Adds an identifier to the current scope; only the current scope is checked for duplicates
    pub fn new_identifier(&mut self, id: &str, id_type: Type, position: (usize, usize)) -> Result<(), SymbolTableError> {
        let cur_scope: usize = self.cur_scope;
        let scope_map: &mut HashMap<String, SymbolTableEntry> = &mut self.graph[NodeIndex::new(cur_scope)];

        if let Some(existing) = scope_map.get(id) {
            return Err(SymbolTableError::DuplicateName {
                name: id.to_owned(),
                first_line: existing.position.0
            });
        }

        scope_map.insert(id.to_owned(), SymbolTableEntry {
            name: id.to_owned(),
            symbol_type: id_type,
            position,
            scope: cur_scope,
            is_used: false
        });

        bridge_log::log(
            LogTypes::Debug,
            LogSources::SymbolTable,
            format!("Id [ {} ] of type {} has been declared at {:?} in scope {}", id, id_type, position, cur_scope)
        );
        return Ok(());
    }

    // Finds the scope holding an identifier, walking outward from the current scope
    fn find_scope(&self, id: &str) -> Option<usize> {
        let mut scope: Option<usize> = Some(self.cur_scope);

        while let Some(cur) = scope {
            if self.graph[NodeIndex::new(cur)].contains_key(id) {
                return Some(cur);
            }
            scope = self.parent_of(cur);
        }

        return None;
    }

    // Gets the symbol table entry visible from the current scope
    pub fn get_symbol(&self, id: &str) -> Result<&SymbolTableEntry, SymbolTableError> {
        return self.find_scope(id)
            .and_then(|scope| self.graph[NodeIndex::new(scope)].get(id))
            .ok_or_else(|| SymbolTableError::NotFound { name: id.to_owned() });
    }

    // Updates a field of the visible entry for the identifier
    pub fn set_entry_field(&mut self, id: &str, field: SymbolTableEntryField) -> Result<(), SymbolTableError> {
        let scope: usize = self.find_scope(id).ok_or_else(|| SymbolTableError::NotFound { name: id.to_owned() })?;

        if let Some(entry) = self.graph[NodeIndex::new(scope)].get_mut(id) {
            match field {
                SymbolTableEntryField::Used => entry.is_used = true
            }
        }
        return Ok(());
    }

    // Every entry of every scope, ordered by scope and then by position
    pub fn entries(&self) -> Vec<&SymbolTableEntry> {
        let mut all_entries: Vec<&SymbolTableEntry> = self.graph
            .raw_nodes()
            .iter()
            .flat_map(|node| node.weight.values())
            .collect();
        all_entries.sort_by_key(|entry| (entry.scope, entry.position));
        return all_entries;
    }

    pub fn unused_symbols(&self) -> Vec<&SymbolTableEntry> {
        return self.entries().into_iter().filter(|entry| !entry.is_used).collect();
    }

    // Logs a warning for each variable that was declared but never used, returning how many
    pub fn mass_warnings(&self) -> usize {
        let unused: Vec<&SymbolTableEntry> = self.unused_symbols();
        for entry in unused.iter() {
            bridge_log::log(
                LogTypes::Warning,
                LogSources::SymbolTable,
                format!("Warning at {:?}; Id [ {} ] is declared but never used", entry.position, entry.name)
            );
        }
        return unused.len();
    }

    // Text table of all symbols for reports
    pub fn render(&self) -> String {
        let mut table_builder: Builder = Builder::default();

        table_builder.append(format!("{:<16}{:<10}{:<8}{:<12}{}\n", "Id", "Type", "Scope", "Position", "Used?"));
        for entry in self.entries() {
            table_builder.append(format!(
                "{:<16}{:<10}{:<8}{:<12}{}\n",
                entry.name,
                entry.symbol_type.to_string(),
                entry.scope,
                format!("{}:{}", entry.position.0, entry.position.1),
                if entry.is_used { "yes" } else { "no" }
            ));
        }

        return table_builder.string().unwrap_or_default();
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        return SymbolTable::new();
    }
}
