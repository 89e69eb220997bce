mod resolve_tests {
    use crate::error::ParserError;
    use crate::{Comp, Program, SourceUnit};

    #[test]
    fn minimal_global_program() {
        let src = "
            Bar(x) -> .
            Foo(x) -> Bar(x).
            Foo(x) <- Bar(x).
        ";
        let program = Program::parse_str(src).expect("resolve minimal program");
        assert_eq!(program.predicates().len(), 1);
        assert_eq!(program.special_predicates().len(), 1);
        assert_eq!(program.predicates()[0].schema_line(), "Foo/1 (Bar)");
        assert_eq!(program.special_predicates()[0].schema_line(), "Bar/1");
        assert_eq!(program.rules()[0].to_string(), "Foo(x) <- Bar(x).");
    }

    #[test]
    fn program_display_is_deterministic() {
        let src = "
            Bar(x) -> .
            Foo(x) -> Bar(x).
            Foo(x) <- Bar(x).
        ";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(
            program.to_string(),
            "Foo/1 (Bar)\nBar/1\n\nFoo(x) <- Bar(x).\n"
        );
    }

    #[test]
    fn instantiation_scopes_every_name() {
        let src = "
            component C {
                P(x) -> .
                Q(x, y) -> P(x), P(y).
                Q(x, y) <- E(x, y).
            }
            init I = C.
        ";
        let program = Program::parse_str(src).expect("resolve instantiated program");
        assert_eq!(program.predicates()[0].schema_line(), "I:Q/2 (I:P x I:P)");
        assert_eq!(program.special_predicates()[0].schema_line(), "I:P/1");
        assert_eq!(program.rules()[0].to_string(), "I:Q(x, y) <- I:E(x, y).");
    }

    #[test]
    fn past_stage_becomes_suffix() {
        let src = "
            component C {
                A(x) -> .
                R(x) -> .
                R(x) <- A@past(x).
            }
            init S = C.
        ";
        let program = Program::parse_str(src).expect("resolve staged program");
        assert_eq!(program.rules()[0].to_string(), "S:R(x) <- S:A:past(x).");
    }

    #[test]
    fn global_declarations_are_exempt_from_scoping() {
        let src = "
            G(x) -> .
            component C {
                L(x) -> .
                Out(x) -> .
                Out(x) <- G(x), L(x).
            }
            init M1 = C.
        ";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(
            program.rules()[0].to_string(),
            "M1:Out(x) <- G(x), M1:L(x)."
        );
    }

    #[test]
    fn inheritance_merges_parent_declarations() {
        let src = "
            component Base {
                P(x, y) -> .
            }
            component C : Base {
                Q(x) -> .
            }
            init I = C.
        ";
        let program = Program::parse_str(src).expect("resolve inherited program");
        let lines: Vec<String> = program
            .predicates()
            .iter()
            .map(|d| d.schema_line())
            .collect();
        assert_eq!(lines, vec!["I:P/2"]);
        assert_eq!(program.special_predicates()[0].schema_line(), "I:Q/1");
    }

    #[test]
    fn cyclic_inheritance_is_rejected() {
        let src = "
            component A : B { }
            component B : A { }
            init I = A.
        ";
        let err = Program::parse_str(src).expect_err("cycle");
        assert!(matches!(err, ParserError::CyclicInheritance(_)));
    }

    #[test]
    fn command_block_parent_is_rejected() {
        let src = "
            cmd M { }
            component C : M { }
            init I = C.
        ";
        let err = Program::parse_str(src).expect_err("cmd parent");
        assert!(matches!(err, ParserError::CommandBlockInheritance(_, _)));
    }

    #[test]
    fn unknown_component_is_rejected() {
        let err = Program::parse_str("init S = Nope.").expect_err("unknown component");
        assert!(matches!(err, ParserError::UnknownComponent(_)));
    }

    #[test]
    fn duplicate_instantiation_is_rejected() {
        let src = "
            component C { A(x) -> . }
            init S = C.
            init S = C.
        ";
        let err = Program::parse_str(src).expect_err("duplicate id");
        assert!(matches!(err, ParserError::DuplicateInstantiation(_)));
    }

    #[test]
    fn revert_resolves_propagated_past_names() {
        let src = "
            component C { A(x) -> . }
            init S1 = C.
            init S2 = C.
            propagate {A} from S1 to S2.
        ";
        let unit = SourceUnit::parse_str(src).expect("parse source unit");
        assert_eq!(unit.props().len(), 1);
        assert_eq!(unit.props()[0].preds(), ["A".to_string()]);

        let origins = unit.revert_name("S2:A:past");
        assert_eq!(origins.len(), 1);
        assert!(origins.contains("S1:A"));

        let plain = unit.revert_name("S2:A");
        assert!(plain.contains("A"));

        let unscoped = unit.revert_name("A");
        assert!(unscoped.contains("A"));
    }

    #[test]
    fn command_block_collects_metadata() {
        let src = "
            cmd M {
                lang:cmd:DIR[] = \"work\".
                lang:cmd:EVAL[] = \"run.sh\".
                lang:cmd:export(`Out).
                lang:cmd:import(`In).
            }
        ";
        let unit = SourceUnit::parse_str(src).expect("parse command block");
        let Some(Comp::Cmd(block)) = unit.comps().get("M") else {
            panic!("expected a command block named M");
        };
        assert_eq!(block.dir(), Some("work"));
        assert_eq!(block.cmd(), Some("run.sh"));
        assert!(block.exports().contains("Out:past"));
        assert!(block.imports().contains("In"));
    }

    #[test]
    fn command_block_rejects_plain_rules() {
        let src = "
            cmd M {
                p(x) <- q(x).
            }
        ";
        let err = SourceUnit::parse_str(src).expect_err("plain rule in cmd block");
        assert!(matches!(err, ParserError::UnsupportedInBlock(_, _)));
    }

    #[test]
    fn command_block_rejects_constraints() {
        let src = "
            cmd M {
                p(x) -> q(x, y).
            }
        ";
        let err = SourceUnit::parse_str(src).expect_err("constraint in cmd block");
        assert!(matches!(err, ParserError::UnsupportedInBlock(_, _)));
    }
}

mod classification_tests {
    use crate::error::ParserError;
    use crate::Program;

    #[test]
    fn refmode_declaration_round_trip() {
        let src = "Person(p), Person:id(p:n) -> string(n).";
        let program = Program::parse_str(src).expect("resolve refmode program");
        assert!(program.predicates().is_empty());
        assert_eq!(
            program.special_predicates()[0].schema_line(),
            "Person:id/2 (Person x string)"
        );
        assert_eq!(
            program.special_predicates()[0].to_string(),
            "Person(p), Person:id(p:n) -> string(n)."
        );
    }

    #[test]
    fn refmode_owner_mismatch_is_rejected() {
        let src = "Person(p), Animal:id(p:n) -> string(n).";
        let err = Program::parse_str(src).expect_err("owner mismatch");
        assert!(matches!(err, ParserError::ParseDispatch(_, _)));
    }

    #[test]
    fn primitive_types_normalize_capacity() {
        let src = "Age(x, n) -> Person(x), int(n).\nPerson(x) -> .";
        let program = Program::parse_str(src).expect("resolve typed program");
        assert_eq!(
            program.predicates()[0].schema_line(),
            "Age/2 (Person x int[64])"
        );
    }

    #[test]
    fn explicit_capacity_is_kept() {
        let src = "Small(n) -> int[32](n).";
        let program = Program::parse_str(src).expect("resolve typed program");
        assert_eq!(program.predicates()[0].schema_line(), "Small/1 (int[32])");
    }

    #[test]
    fn unbound_type_variable_makes_a_constraint() {
        let src = "p(x) -> q(y).";
        let program = Program::parse_str(src).expect("resolve program");
        assert!(program.predicates().is_empty());
        assert_eq!(program.constraints()[0].to_string(), "p(x) -> q(y).");
    }

    #[test]
    fn non_unary_right_side_makes_a_constraint() {
        let src = "p(x) -> q(x, x).";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(program.constraints()[0].to_string(), "p(x) -> q(x, x).");
    }

    #[test]
    fn partial_type_list_is_rejected() {
        let src = "p(x, y) -> q(x).";
        let err = Program::parse_str(src).expect_err("partial type list");
        assert!(matches!(err, ParserError::MalformedDeclaration(_, _)));
    }

    #[test]
    fn duplicate_head_variable_declaration_is_rejected() {
        let src = "p(x, x) -> t(x), u(x).";
        let err = Program::parse_str(src).expect_err("duplicate head variable");
        assert!(matches!(err, ParserError::MalformedDeclaration(_, _)));
    }
}

mod body_shape_tests {
    use crate::Program;

    #[test]
    fn disjunction_and_negation_round_trip() {
        let src = "p(x) <- (q(x); r(x)), !s(x).";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(
            program.rules()[0].to_string(),
            "p(x) <- (q(x); r(x)), !s(x)."
        );
    }

    #[test]
    fn comparison_with_arithmetic_round_trip() {
        let src = "p(x) <- q(x, y), y + 1 < x.";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(
            program.rules()[0].to_string(),
            "p(x) <- q(x, y), y + 1 < x."
        );
    }

    #[test]
    fn functional_head_with_aggregation() {
        let src = "total[x] = n <- agg<<n = count(y)>>(edge(x, y)).";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(
            program.rules()[0].to_string(),
            "total[x] = n <- agg<<n = count(y)>>(edge(x, y))."
        );
    }

    #[test]
    fn functional_application_inside_expression() {
        let src = "p(x) <- q(x), salary[x] > 100.";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(
            program.rules()[0].to_string(),
            "p(x) <- q(x), salary[x] > 100."
        );
    }

    #[test]
    fn constants_round_trip() {
        let src = "p(x) <- q(x, 0x1F, \"label\", true).";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(
            program.rules()[0].to_string(),
            "p(x) <- q(x, 31, \"label\", true)."
        );
    }

    #[test]
    fn bodiless_fact() {
        let src = "root(x).";
        let program = Program::parse_str(src).expect("resolve program");
        assert_eq!(program.rules()[0].to_string(), "root(x).");
    }
}
