//! Delegating filters that select entities by their recorded facts.
//!
//! Each filter wraps a downstream visitor and forwards only the entities whose facts
//! qualify. The kept filters treat a missing info record as "not kept"; the constant
//! filters require the record to exist - filtering a method that was never analyzed is a
//! pass-ordering bug in the enclosing optimizer and fails fast at the query site.

use crate::{
    metadata::{ClassId, ClassPool, ClassVisitor, FieldId, MemberVisitor, MethodId},
    optimize::value::Value,
    Result,
};

/// Forwards visited classes iff they are marked kept.
#[derive(Debug)]
pub struct KeptClassFilter<V> {
    next: V,
}

impl<V: ClassVisitor> KeptClassFilter<V> {
    /// Wraps the downstream visitor.
    #[must_use]
    pub fn new(next: V) -> Self {
        Self { next }
    }

    /// Unwraps the filter, returning the downstream visitor.
    #[must_use]
    pub fn into_inner(self) -> V {
        self.next
    }
}

impl<V: ClassVisitor> ClassVisitor for KeptClassFilter<V> {
    fn visit_class(&mut self, pool: &mut ClassPool, class: ClassId) -> Result<()> {
        if pool.is_class_kept(class) {
            self.next.visit_class(pool, class)?;
        }
        Ok(())
    }
}

/// Forwards visited fields and methods iff they are marked kept.
#[derive(Debug)]
pub struct KeptMemberFilter<V> {
    next: V,
}

impl<V: MemberVisitor> KeptMemberFilter<V> {
    /// Wraps the downstream visitor.
    #[must_use]
    pub fn new(next: V) -> Self {
        Self { next }
    }

    /// Unwraps the filter, returning the downstream visitor.
    #[must_use]
    pub fn into_inner(self) -> V {
        self.next
    }
}

impl<V: MemberVisitor> MemberVisitor for KeptMemberFilter<V> {
    fn visit_field(&mut self, pool: &mut ClassPool, field: FieldId) -> Result<()> {
        if pool.is_field_kept(field) {
            self.next.visit_field(pool, field)?;
        }
        Ok(())
    }

    fn visit_method(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()> {
        if pool.is_method_kept(method) {
            self.next.visit_method(pool, method)?;
        }
        Ok(())
    }
}

/// Forwards visited members iff their analyzed value is a proven constant.
///
/// For methods the return value is examined, for fields the field value.
/// The member must have been analyzed: a missing info record panics.
#[derive(Debug)]
pub struct ConstantMemberFilter<V> {
    next: V,
}

impl<V: MemberVisitor> ConstantMemberFilter<V> {
    /// Wraps the downstream visitor.
    #[must_use]
    pub fn new(next: V) -> Self {
        Self { next }
    }

    /// Unwraps the filter, returning the downstream visitor.
    #[must_use]
    pub fn into_inner(self) -> V {
        self.next
    }
}

impl<V: MemberVisitor> MemberVisitor for ConstantMemberFilter<V> {
    fn visit_field(&mut self, pool: &mut ClassPool, field: FieldId) -> Result<()> {
        let f = pool.field(field);
        let info = f.optimization_info().unwrap_or_else(|| {
            panic!(
                "no optimization info for field {}.{} - analysis must run before filtering",
                pool.class(field.class).name,
                f.name
            )
        });
        if info.value().is_some_and(Value::is_particular) {
            self.next.visit_field(pool, field)?;
        }
        Ok(())
    }

    fn visit_method(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()> {
        let m = pool.method(method);
        let info = m.optimization_info().unwrap_or_else(|| {
            panic!(
                "no optimization info for method {}.{} - analysis must run before filtering",
                pool.class(method.class).name,
                m.name
            )
        });
        if info.return_value().is_some_and(Value::is_particular) {
            self.next.visit_method(pool, method)?;
        }
        Ok(())
    }
}

/// Forwards a visited method once per parameter slot with a proven constant.
///
/// The receiver slot of instance methods is skipped; only declared parameter
/// slots qualify. A method with `k` qualifying slots is forwarded exactly `k`
/// times, so the downstream visitor runs once per specializable parameter.
/// The method must have been analyzed: a missing info record panics.
#[derive(Debug)]
pub struct ConstantParameterFilter<V> {
    next: V,
}

impl<V: MemberVisitor> ConstantParameterFilter<V> {
    /// Wraps the downstream visitor.
    #[must_use]
    pub fn new(next: V) -> Self {
        Self { next }
    }

    /// Unwraps the filter, returning the downstream visitor.
    #[must_use]
    pub fn into_inner(self) -> V {
        self.next
    }
}

impl<V: MemberVisitor> MemberVisitor for ConstantParameterFilter<V> {
    fn visit_method(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()> {
        let m = pool.method(method);
        let info = m.optimization_info().unwrap_or_else(|| {
            panic!(
                "no optimization info for method {}.{} - analysis must run before filtering",
                pool.class(method.class).name,
                m.name
            )
        });

        // Skip the receiver slot; wide types already count as one slot.
        let start = usize::from(!m.access.is_static());
        let end = start + m.declared_parameter_count();
        let qualifying = (start..end)
            .filter(|&slot| info.parameter_value(slot).is_some_and(Value::is_particular))
            .count();

        for _ in 0..qualifying {
            self.next.visit_method(pool, method)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{Class, ClassAccessFlags, Field, MemberAccessFlags, Method},
        optimize::{
            value::ConstValue, FieldOptimizationInfo, MethodOptimizationInfo,
            ProgramFieldOptimizationInfo, ProgramMethodOptimizationInfo,
        },
    };

    #[derive(Default)]
    struct CountingVisitor {
        fields: usize,
        methods: usize,
    }

    impl MemberVisitor for CountingVisitor {
        fn visit_field(&mut self, _pool: &mut ClassPool, _field: FieldId) -> Result<()> {
            self.fields += 1;
            Ok(())
        }

        fn visit_method(&mut self, _pool: &mut ClassPool, _method: MethodId) -> Result<()> {
            self.methods += 1;
            Ok(())
        }
    }

    fn pool_with_method(descriptor: &str, access: MemberAccessFlags) -> (ClassPool, MethodId) {
        let mut pool = ClassPool::new();
        let class = pool
            .add_class(
                Class::program("A", ClassAccessFlags::PUBLIC, None)
                    .with_method(Method::new("m", descriptor, access).unwrap()),
            )
            .unwrap();
        (pool, MethodId { class, index: 0 })
    }

    fn analyzed(pool: &mut ClassPool, method: MethodId, info: ProgramMethodOptimizationInfo) {
        pool.method_mut(method)
            .set_optimization_info(MethodOptimizationInfo::Program(info));
    }

    #[test]
    fn test_kept_member_filter_forwards_only_kept() {
        let mut pool = ClassPool::new();
        let class = pool
            .add_class(
                Class::program("A", ClassAccessFlags::PUBLIC, None)
                    .with_field(Field::new("f", "I", MemberAccessFlags::PUBLIC))
                    .with_method(Method::new("m", "()V", MemberAccessFlags::PUBLIC).unwrap()),
            )
            .unwrap();

        pool.method_mut(MethodId { class, index: 0 })
            .set_optimization_info(MethodOptimizationInfo::Kept);

        let mut filter = KeptMemberFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();

        // the unmarked field is dropped, the kept method passes
        assert_eq!(filter.next.fields, 0);
        assert_eq!(filter.next.methods, 1);
    }

    #[test]
    fn test_kept_class_filter() {
        let mut pool = ClassPool::new();
        pool.add_class(Class::program("A", ClassAccessFlags::PUBLIC, None))
            .unwrap();
        pool.add_class(Class::library("Lib", ClassAccessFlags::PUBLIC, None))
            .unwrap();

        struct Count(usize);
        impl ClassVisitor for Count {
            fn visit_class(&mut self, _pool: &mut ClassPool, _class: ClassId) -> Result<()> {
                self.0 += 1;
                Ok(())
            }
        }

        let mut filter = KeptClassFilter::new(Count(0));
        pool.classes_accept(&mut filter).unwrap();
        assert_eq!(filter.next.0, 1);
    }

    #[test]
    fn test_constant_member_filter_particular_return() {
        let (mut pool, method) = pool_with_method("()I", MemberAccessFlags::PUBLIC);
        let mut info = ProgramMethodOptimizationInfo::conservative(1);
        info.return_value = Value::Particular(ConstValue::Int(3));
        analyzed(&mut pool, method, info);

        let mut filter = ConstantMemberFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
        assert_eq!(filter.next.methods, 1);
    }

    #[test]
    fn test_constant_member_filter_unknown_return() {
        let (mut pool, method) = pool_with_method("()I", MemberAccessFlags::PUBLIC);
        analyzed(&mut pool, method, ProgramMethodOptimizationInfo::conservative(1));

        let mut filter = ConstantMemberFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
        assert_eq!(filter.next.methods, 0);
    }

    #[test]
    fn test_constant_member_filter_kept_sentinel_has_no_value() {
        let (mut pool, method) = pool_with_method("()I", MemberAccessFlags::PUBLIC);
        pool.method_mut(method)
            .set_optimization_info(MethodOptimizationInfo::Kept);

        let mut filter = ConstantMemberFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
        assert_eq!(filter.next.methods, 0);
    }

    #[test]
    #[should_panic(expected = "no optimization info")]
    fn test_constant_member_filter_unanalyzed_method_panics() {
        let (mut pool, _) = pool_with_method("()I", MemberAccessFlags::PUBLIC);
        let mut filter = ConstantMemberFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
    }

    #[test]
    fn test_constant_member_filter_particular_field_value() {
        let mut pool = ClassPool::new();
        let class = pool
            .add_class(
                Class::program("A", ClassAccessFlags::PUBLIC, None)
                    .with_field(Field::new("f", "I", MemberAccessFlags::PRIVATE)),
            )
            .unwrap();
        pool.field_mut(FieldId { class, index: 0 })
            .set_optimization_info(FieldOptimizationInfo::Program(ProgramFieldOptimizationInfo {
                value: Value::Particular(ConstValue::Int(0)),
                ..Default::default()
            }));

        let mut filter = ConstantMemberFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
        assert_eq!(filter.next.fields, 1);
    }

    #[test]
    fn test_parameter_filter_forwards_once_per_particular_slot() {
        // static (III)V: slots 0..3, particular at 0 and 2
        let (mut pool, method) = pool_with_method("(III)V", MemberAccessFlags::STATIC);
        let mut info = ProgramMethodOptimizationInfo::conservative(3);
        info.parameter_values[0] = Value::Particular(ConstValue::Int(1));
        info.parameter_values[2] = Value::Particular(ConstValue::Int(2));
        analyzed(&mut pool, method, info);

        let mut filter = ConstantParameterFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
        assert_eq!(filter.next.methods, 2);
    }

    #[test]
    fn test_parameter_filter_skips_receiver_slot() {
        // instance (I)V: slot 0 is the receiver, slot 1 the declared parameter
        let (mut pool, method) = pool_with_method("(I)V", MemberAccessFlags::PUBLIC);
        let mut info = ProgramMethodOptimizationInfo::conservative(2);
        info.parameter_values[0] = Value::Particular(ConstValue::Null);
        analyzed(&mut pool, method, info);

        let mut filter = ConstantParameterFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
        assert_eq!(filter.next.methods, 0);
    }

    #[test]
    fn test_parameter_filter_wide_type_is_one_slot() {
        // static (IJI)V: three logical slots despite the wide long
        let (mut pool, method) = pool_with_method("(IJI)V", MemberAccessFlags::STATIC);
        let mut info = ProgramMethodOptimizationInfo::conservative(3);
        info.parameter_values[1] = Value::Particular(ConstValue::Long(9));
        analyzed(&mut pool, method, info);

        let mut filter = ConstantParameterFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
        assert_eq!(filter.next.methods, 1);
    }

    #[test]
    fn test_parameter_filter_no_parameters_no_forwards() {
        let (mut pool, method) = pool_with_method("()V", MemberAccessFlags::PUBLIC);
        analyzed(&mut pool, method, ProgramMethodOptimizationInfo::conservative(1));

        let mut filter = ConstantParameterFilter::new(CountingVisitor::default());
        pool.all_members_accept(&mut filter).unwrap();
        assert_eq!(filter.next.methods, 0);
    }
}
