//! Evaluator integration tests.
//!
//! Parses Python source, runs it and checks what it printed or raised.

use bumpalo::Bump;
use pysmoke_evaluator::{Interpreter, RuntimeError, Value};
use pysmoke_parser::Parser;

const SMOKE_SCRIPT: &str = include_str!("../../pysmoke_compiler/fixtures/smoke.py");

/// Helper: run `source` and return its output and result.
fn run_with_depth(source: &str, max_depth: u32) -> (String, Result<(), RuntimeError>) {
    let arena = Bump::new();
    let mut parser = Parser::new(&arena, "test.py", source);
    let module = parser.parse_module();
    let diagnostics = parser.take_diagnostics();
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.diagnostics());

    let mut interpreter = Interpreter::new(Vec::<u8>::new()).with_max_recursion_depth(max_depth);
    let result = interpreter.run_module(&module);
    let output = String::from_utf8(interpreter.into_output()).expect("utf-8 output");
    (output, result)
}

/// Helper: run `source`, asserting success, and return what it printed.
fn run(source: &str) -> String {
    let (output, result) = run_with_depth(source, 200);
    if let Err(err) = result {
        panic!("unexpected {} after output {:?}", err, output);
    }
    output
}

/// Helper: run `source`, asserting failure, and return the error.
fn run_err(source: &str) -> RuntimeError {
    match run_with_depth(source, 200) {
        (_, Err(err)) => err,
        (output, Ok(())) => panic!("expected an error, got output {:?}", output),
    }
}

// ============================================================================
// The smoke script
// ============================================================================

#[test]
fn test_smoke_script_output() {
    assert_eq!(
        run(SMOKE_SCRIPT),
        "Factorial of 5 is: 120\nHello, my name is John\n0\n1\n2\n3\n4\n0\n1\n2\n3\n4\n"
    );
}

#[test]
fn test_globals_after_run() {
    let arena = Bump::new();
    let mut parser = Parser::new(&arena, "smoke.py", SMOKE_SCRIPT);
    let module = parser.parse_module();
    let mut interpreter = Interpreter::new(Vec::<u8>::new());
    interpreter.run_module(&module).expect("smoke script runs");

    assert!(matches!(interpreter.global("result"), Some(Value::Int(120))));
    assert!(matches!(interpreter.global("count"), Some(Value::Int(5))));
    assert!(matches!(interpreter.global("i"), Some(Value::Int(4))));
    assert!(matches!(interpreter.global("john"), Some(Value::Instance(_))));
    assert_eq!(
        interpreter.global("greeting").map(|v| v.to_str()).as_deref(),
        Some("Hello, my name is John")
    );
    assert!(interpreter.global("n").is_none());
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_arithmetic() {
    let source = "print(7 // 2, -7 // 2, 7 % -3, 2 ** 10, 7 / 2, 6 / 3)\nprint(1 + 2 * 3 - 4, (1 + 2) * 3, -2 ** 2, 2 ** -1)\n";
    assert_eq!(run(source), "3 -4 -2 1024 3.5 2.0\n3 9 -4 0.5\n");
}

#[test]
fn test_mixed_numbers() {
    assert_eq!(run("print(1 + 2.5, True + 1, 3 * 1.0, 10 // 4.0, 0.1 + 0.2)\n"), "3.5 2 3.0 2.0 0.30000000000000004\n");
}

#[test]
fn test_bitwise_and_shifts() {
    assert_eq!(run("print(6 & 3, 6 | 3, 6 ^ 3, ~5, 1 << 4, -16 >> 2)\n"), "2 7 5 -6 16 -4\n");
}

#[test]
fn test_boolean_operators_return_operands() {
    assert_eq!(run("print(0 or 'x', 3 and 4, None or 0, not 0, not 'a')\n"), "x 4 0 True False\n");
}

#[test]
fn test_short_circuit_skips_right_operand() {
    assert_eq!(run("print(False and undefined_name, True or undefined_name)\n"), "False True\n");
}

#[test]
fn test_comparison_chains() {
    let source = "x = 5\nprint(1 < x < 10, 1 < x > 10, x == 5.0, 'a' < 'b', 3 != '3')\nprint(2 in [1, 2], 'z' not in 'abc', None is None, x is not None)\n";
    assert_eq!(run(source), "True False True True True\nTrue True True True\n");
}

#[test]
fn test_identity_and_membership_of_objects() {
    let source = "\
class P:
    def hello(self):
        return 1

p = P()
q = P()
xs = [p, [1, 2]]
print(p in xs, q in xs, [1, 2] in xs, xs == [p, [1, 2]], xs == [q, [1, 2]])
print(p is p, p is q, p.hello == p.hello, p.hello == q.hello, [p] < [p, 1])
";
    assert_eq!(run(source), "True False True True False\nTrue False True False True\n");
}

#[test]
fn test_strings() {
    let source = "s = 'ab' + \"cd\"\nprint(s, s * 2, len(s), s[0], s[-1])\nprint('it' 's', str(12) + '!')\n";
    assert_eq!(run(source), "abcd abcdabcd 4 a d\nits 12!\n");
}

#[test]
fn test_lists() {
    let source = "xs = [1, 'two', 3.0]\nxs[0] = 10\nxs += [None]\nprint(xs, len(xs), xs[-2])\nprint([0] * 3, [1] + [2], [] == [], [1, [2]])\n";
    assert_eq!(run(source), "[10, 'two', 3.0, None] 4 3.0\n[0, 0, 0] [1, 2] True [1, [2]]\n");
}

#[test]
fn test_list_aliasing() {
    assert_eq!(run("a = [1]\nb = a\nb += [2]\nb[0] = 9\nprint(a)\n"), "[9, 2]\n");
}

#[test]
fn test_float_formatting() {
    assert_eq!(run("print(120.0, 1e16, 1.5e-5, 2.5, float(3), -0.0)\n"), "120.0 1e+16 1.5e-05 2.5 3.0 -0.0\n");
}

#[test]
fn test_builtin_conversions() {
    let source = "print(int('42') + 1, int(-3.9), float('1.5'), str(True), bool([]), abs(-7), abs(-2.5))\n";
    assert_eq!(run(source), "43 -3 1.5 True False 7 2.5\n");
}

#[test]
fn test_print_keywords() {
    assert_eq!(run("print(1, 2, 3, sep='-', end='!\\n')\nprint()\nprint('a', end='')\nprint('b')\n"), "1-2-3!\n\nab\n");
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_if_elif_else() {
    let source = "def sign(n):\n    if n < 0:\n        return -1\n    elif n == 0:\n        return 0\n    else:\n        return 1\nprint(sign(-5), sign(0), sign(9))\n";
    assert_eq!(run(source), "-1 0 1\n");
}

#[test]
fn test_loops_with_break_continue_else() {
    let source = "\
for i in range(10):
    if i % 2 == 0:
        continue
    if i > 6:
        break
    print(i)
else:
    print('not reached')
n = 0
while n < 3:
    n += 1
else:
    print('done', n)
";
    assert_eq!(run(source), "1\n3\n5\ndone 3\n");
}

#[test]
fn test_range_forms() {
    assert_eq!(
        run("for i in range(2, 11, 4):\n    print(i)\nfor i in range(3, 0, -1):\n    print(i)\nprint(range(5), len(range(0, 10, 3)))\n"),
        "2\n6\n10\n3\n2\n1\nrange(0, 5) 4\n"
    );
}

#[test]
fn test_iterating_strings() {
    assert_eq!(run("for c in 'hé':\n    print(c)\n"), "h\né\n");
}

#[test]
fn test_augmented_assignment_on_attributes_and_items() {
    let source = "class C:\n    def __init__(self):\n        self.n = 1\nc = C()\nc.n *= 5\nxs = [1, 2]\nxs[1] **= 3\nprint(c.n, xs)\n";
    assert_eq!(run(source), "5 [1, 8]\n");
}

// ============================================================================
// Functions and classes
// ============================================================================

#[test]
fn test_default_and_keyword_arguments() {
    let source = "def greet(name, greeting='Hello', punct='!'):\n    return greeting + ', ' + name + punct\nprint(greet('Ann'))\nprint(greet('Bob', punct='?'))\nprint(greet(greeting='Hi', name='Cy'))\n";
    assert_eq!(run(source), "Hello, Ann!\nHello, Bob?\nHi, Cy!\n");
}

#[test]
fn test_recursion() {
    let source = "def fib(n):\n    if n < 2:\n        return n\n    return fib(n - 1) + fib(n - 2)\nprint(fib(15))\n";
    assert_eq!(run(source), "610\n");
}

#[test]
fn test_function_without_return_gives_none() {
    assert_eq!(run("def f():\n    pass\nprint(f())\n"), "None\n");
}

#[test]
fn test_nested_function_reads_enclosing_locals() {
    let source = "def outer(x):\n    def inner(y):\n        return x + y\n    return inner(10)\nprint(outer(5))\n";
    assert_eq!(run(source), "15\n");
}

#[test]
fn test_functions_see_later_globals() {
    assert_eq!(run("def f():\n    return g * 2\ng = 21\nprint(f())\n"), "42\n");
}

#[test]
fn test_classes_methods_and_inheritance() {
    let source = "\
class Animal:
    kind = 'animal'
    def __init__(self, name):
        self.name = name
    def describe(self):
        return self.name + ' is an ' + self.kind
class Dog(Animal):
    def speak(self):
        return self.name + ' says woof'
d = Dog('Rex')
print(d.describe())
print(d.speak())
print(Animal.kind, d.kind)
";
    assert_eq!(run(source), "Rex is an animal\nRex says woof\nanimal animal\n");
}

#[test]
fn test_bound_method_can_be_stored() {
    let source = "class A:\n    def __init__(self, v):\n        self.v = v\n    def get(self):\n        return self.v\nm = A(3).get\nprint(m())\n";
    assert_eq!(run(source), "3\n");
}

#[test]
fn test_value_reprs() {
    let source = "class P:\n    pass\ndef f():\n    pass\nprint(P, P(), f, len, ['a', None])\n";
    assert_eq!(
        run(source),
        "<class '__main__.P'> <__main__.P object> <function f> <built-in function len> ['a', None]\n"
    );
}

#[test]
fn test_builtins_can_be_shadowed() {
    assert_eq!(run("def len(x):\n    return 99\nprint(len('abc'))\n"), "99\n");
}

// ============================================================================
// Runtime errors
// ============================================================================

#[test]
fn test_name_error() {
    let err = run_err("x = 1\nprint(y)\n");
    assert!(matches!(err, RuntimeError::NameError { .. }));
    assert_eq!(err.to_string(), "NameError: name 'y' is not defined");
    let span = err.span().expect("span");
    assert_eq!((span.start, span.length), (12, 1));
}

#[test]
fn test_output_before_error_is_kept() {
    let (output, result) = run_with_depth("print('before')\nprint(1 / 0)\nprint('after')\n", 200);
    assert_eq!(output, "before\n");
    assert!(matches!(result, Err(RuntimeError::ZeroDivisionError { .. })));
}

#[test]
fn test_type_errors() {
    assert_eq!(
        run_err("print('a' + 1)\n").to_string(),
        "TypeError: unsupported operand type(s) for +: 'str' and 'int'"
    );
    assert_eq!(run_err("x = 5\nx()\n").message(), "'int' object is not callable");
    assert_eq!(
        run_err("def f(a, b):\n    pass\nf(1)\n").message(),
        "f() missing 1 required positional argument: 'b'"
    );
    assert_eq!(
        run_err("def f(a):\n    pass\nf(1, 2)\n").message(),
        "f() takes 1 positional argument but 2 were given"
    );
    assert_eq!(
        run_err("def f(a):\n    pass\nf(1, a=2)\n").message(),
        "f() got multiple values for argument 'a'"
    );
    assert_eq!(
        run_err("def f(a):\n    pass\nf(b=2)\n").message(),
        "f() got an unexpected keyword argument 'b'"
    );
    assert_eq!(run_err("for x in 5:\n    pass\n").message(), "'int' object is not iterable");
    assert_eq!(run_err("class A:\n    pass\nA(1)\n").message(), "A() takes no arguments");
}

#[test]
fn test_attribute_error() {
    let err = run_err("class A:\n    pass\nA().missing\n");
    assert!(matches!(err, RuntimeError::AttributeError { .. }));
    assert_eq!(err.message(), "'A' object has no attribute 'missing'");
}

#[test]
fn test_index_and_value_errors() {
    assert!(matches!(run_err("[1, 2][5]\n"), RuntimeError::IndexError { .. }));
    assert!(matches!(run_err("int('abc')\n"), RuntimeError::ValueError { .. }));
    assert!(matches!(run_err("range(0, 5, 0)\n"), RuntimeError::ValueError { .. }));
}

#[test]
fn test_integer_overflow() {
    let err = run_err("x = 9223372036854775807\nx = x + 1\n");
    assert!(matches!(err, RuntimeError::OverflowError { .. }));
}

#[test]
fn test_recursion_limit() {
    let (output, result) = run_with_depth("def f(n):\n    return f(n + 1)\nprint('start')\nf(0)\n", 50);
    assert_eq!(output, "start\n");
    let err = result.expect_err("recursion error");
    assert!(matches!(err, RuntimeError::RecursionError { .. }));
    assert_eq!(err.to_string(), "RecursionError: maximum recursion depth exceeded");
}

#[test]
fn test_recursion_within_limit() {
    let source = "def depth(n):\n    if n == 0:\n        return 0\n    return 1 + depth(n - 1)\nprint(depth(40))\n";
    let (output, result) = run_with_depth(source, 50);
    assert!(result.is_ok());
    assert_eq!(output, "40\n");
}
