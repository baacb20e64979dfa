use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pysmoke_parser::Parser;

// A medium-size Python source with the constructs the parser supports
const PYTHON_SOURCE: &str = r#"
# Inventory bookkeeping
class Item:
    def __init__(self, name, price, quantity=0):
        self.name = name
        self.price = price
        self.quantity = quantity

    def total(self):
        return self.price * self.quantity

    def describe(self):
        return self.name + ": " + str(self.quantity) + " @ " + str(self.price)


class Inventory:
    def __init__(self):
        self.items = []

    def add(self, item):
        self.items = self.items + [item]

    def value(self):
        total = 0
        for item in self.items:
            total += item.total()
        return total

    def find(self, name):
        for item in self.items:
            if item.name == name:
                return item
        return None


def fibonacci(n):
    if n < 2:
        return n
    return fibonacci(n - 1) + fibonacci(n - 2)


def classify(n):
    if n < 0:
        return "negative"
    elif n == 0:
        return "zero"
    elif n % 2 == 0 and n not in [2, 4, 8]:
        return "even"
    else:
        return "odd"


inventory = Inventory()
inventory.add(Item("apple", 3, 10))
inventory.add(Item("pear", 4, quantity=2))
print("value:", inventory.value(), sep=" ")

i = 0
while i < 20:
    if classify(i) == "odd":
        i += 1
        continue
    print(i, fibonacci(i) ** 2 // 3, -i << 2 | 1)
    i += 1
else:
    print("done")
"#;

fn bench_parse_python(c: &mut Criterion) {
    c.bench_function("parse_python_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let mut parser = Parser::new(&arena, "bench.py", black_box(PYTHON_SOURCE));
            let module = parser.parse_module();
            black_box(module.body.len());
        });
    });
}

criterion_group!(benches, bench_parse_python);
criterion_main!(benches);
