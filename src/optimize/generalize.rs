//! Generalizing member references to their most general accessible declaring class.
//!
//! Rewriting a call site's reference to the most general ancestor that declares the same
//! public member increases the chance that unrelated call sites become textually identical,
//! which later merging and devirtualization passes exploit.
//!
//! A candidate class qualifies when it is public, available (its full definition ships with
//! the optimized output), and declares a public member of identical name and descriptor.
//! The walk follows superclass links only and keeps going to the root: the **most general**
//! qualifying ancestor wins, not the first one found. Field references may generalize to
//! the starting class itself, because field resolution starts from the statically named
//! type; virtual calls only consider strict ancestors.
//!
//! Interface declarations are not consulted by the walk, so default methods declared only
//! on an interface never become generalization targets. Whether they should is an open
//! product question; the behavior here mirrors the superclass-only search of the original
//! optimizer.

use crate::{
    metadata::{ClassId, ClassPool, InstructionVisitor, MethodId, Opcode, RefConstant},
    optimize::{
        config::OptimizeConfig,
        editor::ReferenceEditor,
        events::{Event, EventLog},
    },
    Result,
};

/// Which member kind a hierarchy search is looking for.
#[derive(Clone, Copy)]
enum MemberKind {
    Field,
    Method,
}

/// Rewrites field and virtual-call references to their most general
/// accessible declaring class.
#[derive(Debug)]
pub struct MemberReferenceGeneralizer<'a, E> {
    generalize_field_refs: bool,
    generalize_method_refs: bool,
    editor: &'a mut E,
    events: EventLog,
}

impl<'a, E: ReferenceEditor> MemberReferenceGeneralizer<'a, E> {
    /// Creates a generalizer with explicit per-kind switches.
    #[must_use]
    pub fn new(generalize_field_refs: bool, generalize_method_refs: bool, editor: &'a mut E) -> Self {
        Self {
            generalize_field_refs,
            generalize_method_refs,
            editor,
            events: EventLog::new(),
        }
    }

    /// Creates a generalizer configured from the optimization config.
    #[must_use]
    pub fn from_config(config: &OptimizeConfig, editor: &'a mut E) -> Self {
        Self::new(config.generalize_field_refs, config.generalize_method_refs, editor)
    }

    /// The events recorded by this generalizer so far.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    fn generalize_field_access(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        r: &RefConstant,
    ) -> Result<()> {
        if self.editor.is_modified(method, offset) {
            return Ok(());
        }
        let Some(start) = pool.class_by_name(&r.class_name) else {
            return Ok(());
        };

        // field resolution starts from the statically named type, so the
        // start class itself is a candidate
        let Some(winner) = most_general_declaration(pool, Some(start), r, MemberKind::Field) else {
            return Ok(());
        };
        if winner == start {
            return Ok(());
        }

        let to = pool.class(winner).name.clone();
        let target = RefConstant::new(&to, &r.name, &r.descriptor);
        self.editor.replace_field_ref(pool, method, offset, target)?;
        tracing::debug!(site = %method, offset, %to, "generalized field reference");
        self.events.record(Event::FieldRefGeneralized {
            site: method,
            offset,
            to,
        });
        Ok(())
    }

    fn generalize_virtual_call(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        r: &RefConstant,
    ) -> Result<()> {
        if self.editor.is_modified(method, offset) {
            return Ok(());
        }
        let Some(start) = pool.class_by_name(&r.class_name) else {
            return Ok(());
        };

        // strict ancestors only
        let above = pool.superclass_of(start);
        let Some(winner) = most_general_declaration(pool, above, r, MemberKind::Method) else {
            return Ok(());
        };

        let to = pool.class(winner).name.clone();
        let target = RefConstant::new(&to, &r.name, &r.descriptor);
        self.editor.replace_method_ref(pool, method, offset, target)?;
        tracing::debug!(site = %method, offset, %to, "generalized method reference");
        self.events.record(Event::MethodRefGeneralized {
            site: method,
            offset,
            to,
        });
        Ok(())
    }
}

impl<E: ReferenceEditor> InstructionVisitor for MemberReferenceGeneralizer<'_, E> {
    fn visit_instruction(
        &mut self,
        pool: &mut ClassPool,
        method: MethodId,
        offset: u32,
        op: &Opcode,
    ) -> Result<()> {
        match op {
            Opcode::GetField(r) | Opcode::PutField(r) | Opcode::GetStatic(r) | Opcode::PutStatic(r)
                if self.generalize_field_refs =>
            {
                self.generalize_field_access(pool, method, offset, r)
            }
            Opcode::InvokeVirtual(r) if self.generalize_method_refs => {
                self.generalize_virtual_call(pool, method, offset, r)
            }
            _ => Ok(()),
        }
    }
}

/// Walks from `from` to the hierarchy root and returns the most general class
/// that is public, available, and declares a public member matching `r`.
fn most_general_declaration(
    pool: &ClassPool,
    from: Option<ClassId>,
    r: &RefConstant,
    kind: MemberKind,
) -> Option<ClassId> {
    let mut best = None;
    let mut current = from;
    while let Some(id) = current {
        let class = pool.class(id);
        if class.access.is_public() && class.is_available() && declares_public_member(pool, id, r, kind)
        {
            best = Some(id);
        }
        current = class.super_class();
    }
    best
}

fn declares_public_member(pool: &ClassPool, id: ClassId, r: &RefConstant, kind: MemberKind) -> bool {
    match kind {
        MemberKind::Field => pool
            .find_field(id, &r.name, &r.descriptor)
            .is_some_and(|f| pool.field(f).access.is_public()),
        MemberKind::Method => pool
            .find_method(id, &r.name, &r.descriptor)
            .is_some_and(|m| pool.method(m).access.is_public()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            Class, ClassAccessFlags, CodeAttribute, Field, Instruction, MemberAccessFlags, Method,
            ProcessingFlags,
        },
        optimize::{editor::CodeAttributeEditor, events::EventKind},
    };

    fn public_method(name: &str, descriptor: &str) -> Method {
        Method::new(name, descriptor, MemberAccessFlags::PUBLIC).unwrap()
    }

    /// `Root (public, available) <- Mid (public, not available) <- Leaf`,
    /// with public `foo()V` declared only on `Root`, plus a caller class
    /// whose single method holds the instructions under test.
    fn hierarchy_pool(instructions: Vec<Instruction>) -> (ClassPool, MethodId) {
        let mut pool = ClassPool::new();
        pool.add_class(
            Class::program("Root", ClassAccessFlags::PUBLIC, None)
                .with_method(public_method("foo", "()V"))
                .with_field(Field::new("f", "I", MemberAccessFlags::PUBLIC)),
        )
        .unwrap();
        pool.add_class(
            Class::program("Mid", ClassAccessFlags::PUBLIC, Some("Root"))
                .with_processing_flags(ProcessingFlags::empty()),
        )
        .unwrap();
        pool.add_class(
            Class::program("Leaf", ClassAccessFlags::PUBLIC, Some("Mid"))
                .with_method(public_method("foo", "()V"))
                .with_field(Field::new("f", "I", MemberAccessFlags::PUBLIC)),
        )
        .unwrap();
        let caller = pool
            .add_class(
                Class::program("Caller", ClassAccessFlags::PUBLIC, None).with_method(
                    public_method("run", "()V").with_code(CodeAttribute::new(2, 1, instructions)),
                ),
            )
            .unwrap();
        pool.resolve_superclasses().unwrap();
        (pool, MethodId { class: caller, index: 0 })
    }

    fn ref_class_at(pool: &ClassPool, method: MethodId, offset: u32) -> String {
        let code = pool.method(method).code.as_ref().unwrap();
        let op = &code.instruction_at(offset).unwrap().op;
        op.field_ref()
            .or_else(|| op.method_ref())
            .unwrap()
            .class_name
            .clone()
    }

    #[test]
    fn test_virtual_call_generalizes_to_most_general_available_ancestor() {
        let (mut pool, caller) = hierarchy_pool(vec![Instruction {
            offset: 0,
            op: Opcode::InvokeVirtual(RefConstant::new("Leaf", "foo", "()V")),
        }]);
        let mut editor = CodeAttributeEditor::new();
        let mut generalizer = MemberReferenceGeneralizer::new(true, true, &mut editor);
        pool.instructions_accept(caller, &mut generalizer).unwrap();

        // Mid is skipped (not available); Root wins
        assert_eq!(ref_class_at(&pool, caller, 0), "Root");
        assert_eq!(generalizer.events().count_of(EventKind::MethodRefGeneralized), 1);
        assert!(editor.is_modified(caller, 0));
    }

    #[test]
    fn test_virtual_call_without_accessible_ancestor_is_unchanged() {
        let (mut pool, caller) = hierarchy_pool(vec![Instruction {
            offset: 0,
            op: Opcode::InvokeVirtual(RefConstant::new("Leaf", "bar", "()V")),
        }]);
        let mut editor = CodeAttributeEditor::new();
        let mut generalizer = MemberReferenceGeneralizer::new(true, true, &mut editor);
        pool.instructions_accept(caller, &mut generalizer).unwrap();

        assert_eq!(ref_class_at(&pool, caller, 0), "Leaf");
        assert!(generalizer.events().is_empty());
        assert!(!editor.is_modified(caller, 0));
    }

    #[test]
    fn test_most_general_ancestor_wins_over_nearest() {
        // both Base and Top declare foo and are accessible; Top must win
        let mut pool = ClassPool::new();
        pool.add_class(
            Class::program("Top", ClassAccessFlags::PUBLIC, None)
                .with_method(public_method("foo", "()V")),
        )
        .unwrap();
        pool.add_class(
            Class::program("Base", ClassAccessFlags::PUBLIC, Some("Top"))
                .with_method(public_method("foo", "()V")),
        )
        .unwrap();
        pool.add_class(Class::program("Sub", ClassAccessFlags::PUBLIC, Some("Base")))
            .unwrap();
        let caller = pool
            .add_class(
                Class::program("Caller", ClassAccessFlags::PUBLIC, None).with_method(
                    public_method("run", "()V").with_code(CodeAttribute::new(
                        2,
                        1,
                        vec![Instruction {
                            offset: 0,
                            op: Opcode::InvokeVirtual(RefConstant::new("Sub", "foo", "()V")),
                        }],
                    )),
                ),
            )
            .unwrap();
        pool.resolve_superclasses().unwrap();
        let caller = MethodId { class: caller, index: 0 };

        let mut editor = CodeAttributeEditor::new();
        let mut generalizer = MemberReferenceGeneralizer::new(true, true, &mut editor);
        pool.instructions_accept(caller, &mut generalizer).unwrap();
        assert_eq!(ref_class_at(&pool, caller, 0), "Top");
    }

    #[test]
    fn test_field_generalization_includes_start_class() {
        // f declared on Leaf itself; Root also declares it, so Root wins -
        // but when only Leaf declares it, the reference must stay on Leaf
        let (mut pool, caller) = hierarchy_pool(vec![Instruction {
            offset: 0,
            op: Opcode::GetField(RefConstant::new("Leaf", "f", "I")),
        }]);
        let mut editor = CodeAttributeEditor::new();
        let mut generalizer = MemberReferenceGeneralizer::new(true, true, &mut editor);
        pool.instructions_accept(caller, &mut generalizer).unwrap();
        assert_eq!(ref_class_at(&pool, caller, 0), "Root");

        // drop Root's declaration: the start class is the only candidate and
        // the reference is left untouched, with no modified mark
        let (mut pool, caller) = hierarchy_pool(vec![Instruction {
            offset: 0,
            op: Opcode::PutField(RefConstant::new("Leaf", "f", "I")),
        }]);
        let root = pool.class_by_name("Root").unwrap();
        pool.class_mut(root).fields.clear();
        let mut editor = CodeAttributeEditor::new();
        let mut generalizer = MemberReferenceGeneralizer::new(true, true, &mut editor);
        pool.instructions_accept(caller, &mut generalizer).unwrap();
        assert_eq!(ref_class_at(&pool, caller, 0), "Leaf");
        assert!(!editor.is_modified(caller, 0));
    }

    /// Editor probe that fails the test if the generalizer consults it.
    struct UntouchableEditor;

    impl ReferenceEditor for UntouchableEditor {
        fn is_modified(&self, _method: MethodId, _offset: u32) -> bool {
            panic!("disabled kinds must skip the already-rewritten check");
        }

        fn replace_field_ref(
            &mut self,
            _pool: &mut ClassPool,
            _method: MethodId,
            _offset: u32,
            _target: RefConstant,
        ) -> Result<()> {
            panic!("disabled kinds must not rewrite");
        }

        fn replace_method_ref(
            &mut self,
            _pool: &mut ClassPool,
            _method: MethodId,
            _offset: u32,
            _target: RefConstant,
        ) -> Result<()> {
            panic!("disabled kinds must not rewrite");
        }
    }

    #[test]
    fn test_disabled_kind_is_skipped_entirely() {
        let (mut pool, caller) = hierarchy_pool(vec![
            Instruction {
                offset: 0,
                op: Opcode::InvokeVirtual(RefConstant::new("Leaf", "foo", "()V")),
            },
            Instruction {
                offset: 3,
                op: Opcode::GetField(RefConstant::new("Leaf", "f", "I")),
            },
        ]);
        let mut editor = UntouchableEditor;
        let mut generalizer = MemberReferenceGeneralizer::new(false, false, &mut editor);
        pool.instructions_accept(caller, &mut generalizer).unwrap();
        assert_eq!(ref_class_at(&pool, caller, 0), "Leaf");
    }

    /// Editor probe that reports every offset as already rewritten.
    struct AllModifiedEditor;

    impl ReferenceEditor for AllModifiedEditor {
        fn is_modified(&self, _method: MethodId, _offset: u32) -> bool {
            true
        }

        fn replace_field_ref(
            &mut self,
            _pool: &mut ClassPool,
            _method: MethodId,
            _offset: u32,
            _target: RefConstant,
        ) -> Result<()> {
            panic!("already-rewritten offsets must not be rewritten again");
        }

        fn replace_method_ref(
            &mut self,
            _pool: &mut ClassPool,
            _method: MethodId,
            _offset: u32,
            _target: RefConstant,
        ) -> Result<()> {
            panic!("already-rewritten offsets must not be rewritten again");
        }
    }

    #[test]
    fn test_already_rewritten_offset_is_skipped() {
        let (mut pool, caller) = hierarchy_pool(vec![Instruction {
            offset: 0,
            op: Opcode::InvokeVirtual(RefConstant::new("Leaf", "foo", "()V")),
        }]);
        let mut editor = AllModifiedEditor;
        let mut generalizer = MemberReferenceGeneralizer::new(true, true, &mut editor);
        pool.instructions_accept(caller, &mut generalizer).unwrap();
        assert_eq!(ref_class_at(&pool, caller, 0), "Leaf");
    }

    #[test]
    fn test_unknown_referenced_class_is_left_alone() {
        let (mut pool, caller) = hierarchy_pool(vec![Instruction {
            offset: 0,
            op: Opcode::InvokeVirtual(RefConstant::new("NotInPool", "foo", "()V")),
        }]);
        let mut editor = CodeAttributeEditor::new();
        let mut generalizer = MemberReferenceGeneralizer::new(true, true, &mut editor);
        pool.instructions_accept(caller, &mut generalizer).unwrap();
        assert_eq!(ref_class_at(&pool, caller, 0), "NotInPool");
        assert!(generalizer.events().is_empty());
    }
}
