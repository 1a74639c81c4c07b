//! Import driver: intake, closing the name universe, and finishing builders in
//! dependency order into a [`ClassGraph`].
//!
//! Finishing runs in three steps once intake is closed:
//!
//! 1. Ids. Member and access id ranges are laid out in class order and every
//!    type parameter declaration gets a shell. Scopes are plain name to id
//!    lists, so they are complete at this point.
//! 2. Type parameters. Bounds are completed one nesting level at a time,
//!    enclosing classes first. Within a class, its own list precedes its
//!    methods' lists and each list runs in declaration order. Array classes
//!    for generic arrays in bounds are registered after the last level.
//! 3. Classes. Every class builder is consumed into its class, members and
//!    accesses. Nothing here reads another class's builder, so this step is
//!    freely parallel.

use crate::builder::types::{TypeEnv, TypeParameterBuilder, TypeResolver, TypeScope, TypeVarShell};
use crate::builder::{ClassBuilder, class::FinishedClass};
use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::graph::{ClassGraph, ClassGraphInner};
use crate::model::{
    ClassId, JavaAccess, JavaClass, JavaMember, MemberId, TypeVarId, TypeVarOwner, TypeVariable,
};
use crate::registry::ClassRegistry;
use crate::resolver::{HierarchyResolver, TargetResolver};
use archscope_api::RawClass;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use smol_str::SmolStr;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::time::Instant;

/// Collects one batch of class descriptors and turns them into a graph.
pub struct ClassImporter {
    config: ImportConfig,
    registry: ClassRegistry,
    resolver: Arc<dyn TargetResolver>,
    object: ClassId,
    builders: Vec<ClassBuilder>,
    poisoned: Option<String>,
}

/// One type parameter list and the scope its bounds resolve in.
struct DeclarationList {
    declared_by: String,
    /// Method-level names layered over the class scope; empty for the class's
    /// own list, which the class scope already contains.
    own: Vec<(SmolStr, TypeVarId)>,
    scope: TypeScope,
    parameters: Vec<(TypeVarId, TypeParameterBuilder)>,
}

/// Where one class's finished entities land in the arenas.
struct ClassLayout {
    first_member: u32,
    first_access: u32,
    scope: TypeScope,
}

impl ClassImporter {
    pub fn new(config: ImportConfig) -> Self {
        let registry = ClassRegistry::new(config.warn_on_late_placeholders);
        let object = registry.get(&config.object_type);
        Self {
            config,
            registry,
            resolver: Arc::new(HierarchyResolver),
            object,
            builders: Vec::new(),
            poisoned: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn TargetResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// The live registry; ids handed out here stay valid in the final graph.
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Intake of one class. A failure abandons the whole batch.
    pub fn add_class(&mut self, raw: RawClass) -> Result<ClassId> {
        if let Some(reason) = &self.poisoned {
            return Err(ImportError::Abandoned(reason.clone()));
        }
        match ClassBuilder::from_raw(raw, &self.registry) {
            Ok(builder) => {
                let id = builder.id();
                self.builders.push(builder);
                Ok(id)
            }
            Err(e) => {
                tracing::error!("Intake failed: {}", e);
                self.poisoned = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn add_classes(&mut self, classes: impl IntoIterator<Item = RawClass>) -> Result<()> {
        for raw in classes {
            self.add_class(raw)?;
        }
        Ok(())
    }

    /// Imports a JSON array of raw class records in one call.
    pub fn import_json(config: ImportConfig, json: &str) -> Result<ClassGraph> {
        let classes: Vec<RawClass> = serde_json::from_str(json)?;
        let mut importer = Self::new(config);
        importer.add_classes(classes)?;
        importer.import()
    }

    pub fn import(self) -> Result<ClassGraph> {
        if let Some(reason) = self.poisoned {
            return Err(ImportError::Abandoned(reason));
        }

        let start = Instant::now();
        let Self {
            config,
            registry,
            resolver,
            object,
            mut builders,
            ..
        } = self;
        registry.freeze();
        tracing::debug!(
            "Intake closed: {} declared classes, {} names",
            builders.len(),
            registry.len()
        );

        // Ids and shells.
        let mut shells: Vec<TypeVarShell> = Vec::new();
        let mut class_lists: HashMap<ClassId, Vec<(SmolStr, TypeVarId)>> = HashMap::new();
        let mut params: HashMap<ClassId, Vec<DeclarationList>> = HashMap::new();
        let mut next_member = 0u32;
        let mut next_access = 0u32;
        let mut first_ids = Vec::with_capacity(builders.len());

        for builder in &mut builders {
            let class_id = builder.id();
            first_ids.push((next_member, next_access));

            let class_params = builder.take_type_parameters();
            let ids = allocate_shells(&mut shells, &class_params, TypeVarOwner::Class(class_id));
            builder.set_type_parameter_ids(ids.clone());
            class_lists.insert(class_id, ids.clone());

            let mut lists = vec![DeclarationList {
                declared_by: builder.name().to_string(),
                own: Vec::new(),
                scope: TypeScope::default(),
                parameters: ids.iter().map(|(_, id)| *id).zip(class_params).collect(),
            }];

            let class_name = builder.name().to_string();
            for member in builder.members_mut() {
                let member_id = MemberId(next_member);
                next_member += 1;
                next_access += member.access_count() as u32;

                let member_params = member.take_type_parameters();
                if member_params.is_empty() {
                    continue;
                }
                let ids =
                    allocate_shells(&mut shells, &member_params, TypeVarOwner::Method(member_id));
                member.set_type_parameter_ids(ids.clone());
                lists.push(DeclarationList {
                    declared_by: format!("{}.{}", class_name, member.name()),
                    parameters: ids.iter().map(|(_, id)| *id).zip(member_params).collect(),
                    own: ids,
                    scope: TypeScope::default(),
                });
            }
            params.insert(class_id, lists);
        }

        // Scopes follow the enclosing chain outward.
        let enclosing: HashMap<ClassId, ClassId> = builders
            .iter()
            .filter_map(|b| {
                let outer = b.enclosing_class()?;
                Some((b.id(), registry.get(outer)))
            })
            .collect();
        let mut scopes: HashMap<ClassId, TypeScope> = HashMap::new();
        let mut depths: HashMap<ClassId, usize> = HashMap::new();
        for builder in &builders {
            class_scope(builder.id(), &enclosing, &class_lists, &mut scopes, &mut depths);
        }

        let mut layouts = Vec::with_capacity(builders.len());
        let mut levels: Vec<Vec<Vec<DeclarationList>>> = Vec::new();
        for (builder, (first_member, first_access)) in builders.iter().zip(first_ids) {
            let id = builder.id();
            let scope = scopes.get(&id).cloned().unwrap_or_default();
            let depth = depths.get(&id).copied().unwrap_or(0);

            let mut lists = params.remove(&id).unwrap_or_default();
            for list in &mut lists {
                list.scope = scope.nested(&list.own);
            }

            if levels.len() <= depth {
                levels.resize_with(depth + 1, Vec::new);
            }
            levels[depth].push(lists);
            layouts.push(ClassLayout {
                first_member,
                first_access,
                scope,
            });
        }

        let next_orphan = AtomicU32::new(shells.len() as u32);
        let env = TypeEnv {
            registry: &registry,
            shells: &shells,
            object,
            next_orphan: &next_orphan,
            complete: false,
        };

        // Type parameters, outermost classes first.
        let mut orphans: Vec<TypeVariable> = Vec::new();
        for level in levels {
            let level_orphans: Vec<Vec<TypeVariable>> = if config.parallel {
                level
                    .into_par_iter()
                    .map(|lists| complete_lists(&env, lists))
                    .collect::<Result<_>>()?
            } else {
                level
                    .into_iter()
                    .map(|lists| complete_lists(&env, lists))
                    .collect::<Result<_>>()?
            };
            orphans.extend(level_orphans.into_iter().flatten());
        }
        // Generic arrays in bounds erase through variables that are only now
        // final.
        let bounds_walker = TypeResolver::new(&env);
        for shell in &shells {
            for bound in shell.bounds() {
                bounds_walker.register_array_erasures(bound);
            }
        }
        tracing::debug!("Type parameters completed in {:?}", start.elapsed());

        let env = TypeEnv {
            complete: true,
            ..env
        };

        // Classes, members, accesses.
        let finish = |(builder, layout): (ClassBuilder, ClassLayout)| {
            let mut resolver = TypeResolver::new(&env);
            let finished = builder.finish(
                layout.first_member,
                layout.first_access,
                &mut resolver,
                &layout.scope,
            );
            (finished, resolver.into_orphans())
        };
        let work: Vec<(ClassBuilder, ClassLayout)> = builders.into_iter().zip(layouts).collect();
        let finished: Vec<(FinishedClass, Vec<TypeVariable>)> = if config.parallel {
            work.into_par_iter().map(finish).collect()
        } else {
            work.into_iter().map(finish).collect()
        };
        tracing::debug!("Classes finished in {:?}", start.elapsed());

        let graph = assemble(
            registry,
            shells,
            orphans,
            finished,
            object,
            resolver,
            next_member as usize,
            next_access as usize,
        )?;

        tracing::info!(
            "Imported {} classes ({} placeholders), {} members, {} accesses in {:?}",
            graph.declared_classes().count(),
            graph.placeholders().count(),
            graph.members().count(),
            graph.accesses().count(),
            start.elapsed()
        );
        Ok(graph)
    }
}

fn allocate_shells(
    shells: &mut Vec<TypeVarShell>,
    params: &[TypeParameterBuilder],
    owner: TypeVarOwner,
) -> Vec<(SmolStr, TypeVarId)> {
    params
        .iter()
        .map(|p| {
            let id = TypeVarId(shells.len() as u32);
            shells.push(TypeVarShell::new(p.name().clone(), owner));
            (p.name().clone(), id)
        })
        .collect()
}

/// Scope of `id` and its nesting depth. Cyclic or external enclosing chains
/// simply end.
fn class_scope(
    id: ClassId,
    enclosing: &HashMap<ClassId, ClassId>,
    own: &HashMap<ClassId, Vec<(SmolStr, TypeVarId)>>,
    scopes: &mut HashMap<ClassId, TypeScope>,
    depths: &mut HashMap<ClassId, usize>,
) {
    if scopes.contains_key(&id) {
        return;
    }

    let mut chain = vec![id];
    let mut seen: HashSet<ClassId> = HashSet::from([id]);
    let mut current = id;
    while let Some(&outer) = enclosing.get(&current) {
        if scopes.contains_key(&outer) || !seen.insert(outer) {
            break;
        }
        chain.push(outer);
        current = outer;
    }

    // Innermost last to outermost first.
    let mut parent = chain
        .last()
        .and_then(|last| enclosing.get(last))
        .and_then(|outer| scopes.get(outer).cloned().zip(depths.get(outer).copied()));
    for class in chain.into_iter().rev() {
        let (scope, depth) = match parent {
            Some((scope, depth)) => (scope, depth + 1),
            None => (TypeScope::default(), 0),
        };
        let params = own.get(&class).map(Vec::as_slice).unwrap_or_default();
        let scope = scope.nested(params);
        scopes.insert(class, scope.clone());
        depths.insert(class, depth);
        parent = Some((scope, depth));
    }
}

fn complete_lists(env: &TypeEnv<'_>, lists: Vec<DeclarationList>) -> Result<Vec<TypeVariable>> {
    let mut resolver = TypeResolver::new(env);
    for list in lists {
        for (id, param) in list.parameters {
            param.finish(id, &mut resolver, &list.scope, &list.declared_by)?;
        }
    }
    Ok(resolver.into_orphans())
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    registry: ClassRegistry,
    shells: Vec<TypeVarShell>,
    mut orphans: Vec<TypeVariable>,
    finished: Vec<(FinishedClass, Vec<TypeVariable>)>,
    object: ClassId,
    resolver: Arc<dyn TargetResolver>,
    member_count: usize,
    access_count: usize,
) -> Result<ClassGraph> {
    let slots = registry.into_slots();
    let mut classes: Vec<Option<JavaClass>> = vec![None; slots.len()];
    let mut members: Vec<Option<JavaMember>> = Vec::with_capacity(member_count);
    members.resize_with(member_count, || None);
    let mut accesses: Vec<Option<JavaAccess>> = Vec::with_capacity(access_count);
    accesses.resize_with(access_count, || None);

    for (done, class_orphans) in finished {
        orphans.extend(class_orphans);
        for member in done.members {
            let index = member.id.index();
            members[index] = Some(member);
        }
        for access in done.accesses {
            let index = access.id.index();
            accesses[index] = Some(access);
        }
        let index = done.class.id.index();
        classes[index] = Some(done.class);
    }

    let mut classes: Vec<JavaClass> = classes
        .into_iter()
        .zip(&slots)
        .enumerate()
        .map(|(i, (class, slot))| {
            class.unwrap_or_else(|| JavaClass::placeholder(ClassId(i as u32), slot.name.clone()))
        })
        .collect();

    let nested: Vec<(ClassId, ClassId)> = classes
        .iter()
        .filter_map(|c| c.enclosing_class.map(|outer| (outer, c.id)))
        .collect();
    for (outer, inner) in nested {
        if let Some(class) = classes.get_mut(outer.index()) {
            class.member_classes.push(inner);
        }
    }

    let members = members
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ImportError::Internal("member id range has gaps".into()))?;
    let accesses = accesses
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ImportError::Internal("access id range has gaps".into()))?;

    let mut type_variables: Vec<TypeVariable> = shells
        .into_iter()
        .enumerate()
        .map(|(i, shell)| shell.into_variable(TypeVarId(i as u32), object))
        .collect();
    orphans.sort_by_key(|v| v.id);
    type_variables.extend(orphans);

    let name_index = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| (slot.name, ClassId(i as u32)))
        .collect();

    Ok(ClassGraph::from_inner(ClassGraphInner {
        classes,
        members,
        type_variables,
        accesses,
        name_index,
        object,
        resolver,
        dependencies: OnceCell::new(),
    }))
}
