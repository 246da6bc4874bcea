use pretty_assertions::assert_eq;

use super::*;

#[test]
fn marked_labels_record_positions() {
    let mut builder = MethodBuilder::new("f", Vec::new(), Type::Void);
    let top = builder.new_label();
    let end = builder.new_label();
    builder.mark_label(top);
    builder.emit(Instr::Jump(end));
    builder.mark_label(end);
    builder.emit(Instr::Return);

    assert_eq!(builder.code().len(), 4);
    let method = builder.finish().unwrap();
    assert_eq!(method.labels, vec![0, 2]);
    assert_eq!(method.code[2], Instr::Label(end));
}

#[test]
fn unmarked_label_is_rejected() {
    let mut builder = MethodBuilder::new("loop", Vec::new(), Type::Void);
    let _marked = builder.new_label();
    let dangling = builder.new_label();
    builder.mark_label(Label::new(0));
    builder.emit(Instr::Jump(dangling));

    assert_eq!(
        builder.finish().unwrap_err(),
        LowerError::UnmarkedLabel {
            method: "loop".to_owned(),
            label: dangling,
        }
    );
}

#[test]
fn locals_are_numbered_in_order() {
    let mut builder = MethodBuilder::new("g", vec![Type::Integer], Type::Integer);
    assert_eq!(builder.alloc_local("a", Type::Integer).unwrap(), 0);
    assert_eq!(builder.alloc_local("b", Type::String).unwrap(), 1);
    assert_eq!(builder.name(), "g");

    let method = builder.finish().unwrap();
    assert_eq!(
        method.locals,
        vec![
            LocalSlot {
                name: "a".to_owned(),
                ty: Type::Integer
            },
            LocalSlot {
                name: "b".to_owned(),
                ty: Type::String
            },
        ]
    );
    assert_eq!(method.params, vec![Type::Integer]);
    assert_eq!(method.host, None);
}
