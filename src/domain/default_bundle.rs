//! The content bundle shipped with the engine (§6.1 format). A real deployment
//! loads a bundle produced by the mod-pack compiler (out of scope, §1); this
//! one exists so the world is playable and testable without one.

pub const DEFAULT_BUNDLE_JSON: &str = r#"{
  "formatVersion": 1,
  "generatedAt": "1970-01-01T00:00:00Z",
  "packs": ["base"],
  "elements": [
    {"id":0,"key":"base:empty","name":"Empty","pack":"base","category":"utility","color":0,"density":null,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":5,"bounce":0,"friction":0,"flags":{},"hidden":true},
    {"id":1,"key":"base:stone","name":"Stone","pack":"base","category":"solid","color":4286611584,"density":2700,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":20,"bounce":0,"friction":0.9,"flags":{},"phaseChange":{"high":{"temp":900,"toId":8}}},
    {"id":2,"key":"base:sand","name":"Sand","pack":"base","category":"powder","color":4292919400,"density":1600,"dispersion":2,"lifetime":0,"defaultTemp":20,"heatConductivity":15,"bounce":0.1,"friction":0.6,"flags":{},"phaseChange":{"high":{"temp":1700,"toId":8}}},
    {"id":3,"key":"base:wood","name":"Wood","pack":"base","category":"solid","color":4287322667,"density":700,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":5,"bounce":0,"friction":0.8,"flags":{"flammable":true}},
    {"id":4,"key":"base:metal","name":"Metal","pack":"base","category":"solid","color":4290296008,"density":7800,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":80,"bounce":0,"friction":0.5,"flags":{"conductive":true},"phaseChange":{"high":{"temp":1500,"toId":8}}},
    {"id":5,"key":"base:ice","name":"Ice","pack":"base","category":"solid","color":4291817471,"density":920,"dispersion":0,"lifetime":0,"defaultTemp":-10,"heatConductivity":25,"bounce":0,"friction":0.1,"flags":{"cold":true},"phaseChange":{"high":{"temp":0,"toId":6}}},
    {"id":6,"key":"base:water","name":"Water","pack":"base","category":"liquid","color":4282019493,"density":1000,"dispersion":5,"lifetime":0,"defaultTemp":20,"heatConductivity":60,"bounce":0,"friction":0.05,"flags":{},"phaseChange":{"high":{"temp":100,"toId":10},"low":{"temp":0,"toId":5}}},
    {"id":7,"key":"base:oil","name":"Oil","pack":"base","category":"liquid","color":4281542939,"density":850,"dispersion":4,"lifetime":0,"defaultTemp":20,"heatConductivity":10,"bounce":0,"friction":0.05,"flags":{"flammable":true}},
    {"id":8,"key":"base:lava","name":"Lava","pack":"base","category":"liquid","color":4294919424,"density":3100,"dispersion":1,"lifetime":0,"defaultTemp":1200,"heatConductivity":40,"bounce":0,"friction":0.3,"flags":{"hot":true},"phaseChange":{"low":{"temp":700,"toId":1}}},
    {"id":9,"key":"base:acid","name":"Acid","pack":"base","category":"liquid","color":4287619072,"density":1200,"dispersion":3,"lifetime":0,"defaultTemp":20,"heatConductivity":20,"bounce":0,"friction":0.05,"flags":{"corrosive":true}},
    {"id":10,"key":"base:steam","name":"Steam","pack":"base","category":"gas","color":4294111986,"density":0.6,"dispersion":5,"lifetime":400,"defaultTemp":110,"heatConductivity":15,"bounce":0,"friction":0.02,"flags":{"hot":true},"phaseChange":{"low":{"temp":90,"toId":6}}},
    {"id":11,"key":"base:smoke","name":"Smoke","pack":"base","category":"gas","color":4284900966,"density":0.8,"dispersion":4,"lifetime":200,"defaultTemp":80,"heatConductivity":8,"bounce":0,"friction":0.02,"flags":{}},
    {"id":12,"key":"base:fire","name":"Fire","pack":"base","category":"energy","color":4294928936,"density":null,"dispersion":3,"lifetime":30,"defaultTemp":600,"heatConductivity":30,"bounce":0,"friction":0,"flags":{"hot":true,"ignoreGravity":true},"behavior":"energy_fire"},
    {"id":13,"key":"base:spark","name":"Spark","pack":"base","category":"energy","color":4294967040,"density":null,"dispersion":0,"lifetime":4,"defaultTemp":500,"heatConductivity":10,"bounce":0,"friction":0,"flags":{"hot":true,"conductive":true,"ignoreGravity":true},"behavior":"energy_spark"},
    {"id":14,"key":"base:electricity","name":"Electricity","pack":"base","category":"energy","color":4288269567,"density":null,"dispersion":0,"lifetime":6,"defaultTemp":40,"heatConductivity":5,"bounce":0,"friction":0,"flags":{"conductive":true,"ignoreGravity":true},"behavior":"energy_electricity"},
    {"id":15,"key":"base:gunpowder","name":"Gunpowder","pack":"base","category":"powder","color":4281545523,"density":1000,"dispersion":1,"lifetime":0,"defaultTemp":20,"heatConductivity":10,"bounce":0,"friction":0.4,"flags":{"flammable":true}},
    {"id":16,"key":"base:clone","name":"Clone","pack":"base","category":"utility","color":4294902015,"density":null,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":0,"bounce":0,"friction":0,"flags":{"ignoreGravity":true},"behavior":"utility_clone"},
    {"id":17,"key":"base:void","name":"Void","pack":"base","category":"utility","color":4279242776,"density":null,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":0,"bounce":0,"friction":0,"flags":{"ignoreGravity":true},"behavior":"utility_void"},
    {"id":18,"key":"base:dirt","name":"Dirt","pack":"base","category":"powder","color":4284368435,"density":1300,"dispersion":1,"lifetime":0,"defaultTemp":20,"heatConductivity":10,"bounce":0,"friction":0.7,"flags":{}},
    {"id":19,"key":"base:seed","name":"Seed","pack":"base","category":"bio","color":4287326754,"density":0,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":5,"bounce":0,"friction":0.5,"flags":{},"behavior":"bio_seed"},
    {"id":20,"key":"base:plant","name":"Plant","pack":"base","category":"bio","color":4280453922,"density":null,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":5,"bounce":0,"friction":0.5,"flags":{"flammable":true,"ignoreGravity":true},"behavior":"bio_plant"}
  ],
  "elementKeyToId": {
    "base:empty":0,"base:stone":1,"base:sand":2,"base:wood":3,"base:metal":4,"base:ice":5,
    "base:water":6,"base:oil":7,"base:lava":8,"base:acid":9,"base:steam":10,"base:smoke":11,
    "base:fire":12,"base:spark":13,"base:electricity":14,"base:gunpowder":15,"base:clone":16,
    "base:void":17,"base:dirt":18,"base:seed":19,"base:plant":20
  },
  "reactions": [
    {"aggressor":"base:fire","victim":"base:wood","aggressorId":12,"victimId":3,"chance":0.25,"resultAggressor":"base:fire","resultAggressorId":12,"resultVictim":"base:fire","resultVictimId":12,"spawn":null,"spawnId":null},
    {"aggressor":"base:fire","victim":"base:oil","aggressorId":12,"victimId":7,"chance":0.5,"resultAggressor":"base:fire","resultAggressorId":12,"resultVictim":"base:fire","resultVictimId":12,"spawn":null,"spawnId":null},
    {"aggressor":"base:fire","victim":"base:gunpowder","aggressorId":12,"victimId":15,"chance":0.9,"resultAggressor":"base:fire","resultAggressorId":12,"resultVictim":"base:fire","resultVictimId":12,"spawn":"base:smoke","spawnId":11},
    {"aggressor":"base:fire","victim":"base:plant","aggressorId":12,"victimId":20,"chance":0.2,"resultAggressor":"base:fire","resultAggressorId":12,"resultVictim":"base:fire","resultVictimId":12,"spawn":null,"spawnId":null},
    {"aggressor":"base:fire","victim":"base:seed","aggressorId":12,"victimId":19,"chance":0.15,"resultAggressor":"base:fire","resultAggressorId":12,"resultVictim":"base:fire","resultVictimId":12,"spawn":null,"spawnId":null},
    {"aggressor":"base:fire","victim":"base:water","aggressorId":12,"victimId":6,"chance":0.8,"resultAggressor":null,"resultAggressorId":0,"resultVictim":"base:steam","resultVictimId":10,"spawn":null,"spawnId":null},
    {"aggressor":"base:fire","victim":"base:ice","aggressorId":12,"victimId":5,"chance":0.5,"resultAggressor":null,"resultAggressorId":0,"resultVictim":"base:water","resultVictimId":6,"spawn":null,"spawnId":null},
    {"aggressor":"base:lava","victim":"base:water","aggressorId":8,"victimId":6,"chance":0.6,"resultAggressor":"base:stone","resultAggressorId":1,"resultVictim":"base:steam","resultVictimId":10,"spawn":null,"spawnId":null},
    {"aggressor":"base:lava","victim":"base:wood","aggressorId":8,"victimId":3,"chance":0.4,"resultAggressor":"base:lava","resultAggressorId":8,"resultVictim":"base:fire","resultVictimId":12,"spawn":null,"spawnId":null},
    {"aggressor":"base:lava","victim":"base:oil","aggressorId":8,"victimId":7,"chance":0.6,"resultAggressor":"base:lava","resultAggressorId":8,"resultVictim":"base:fire","resultVictimId":12,"spawn":null,"spawnId":null},
    {"aggressor":"base:lava","victim":"base:ice","aggressorId":8,"victimId":5,"chance":0.7,"resultAggressor":"base:lava","resultAggressorId":8,"resultVictim":"base:water","resultVictimId":6,"spawn":null,"spawnId":null},
    {"aggressor":"base:lava","victim":"base:gunpowder","aggressorId":8,"victimId":15,"chance":0.9,"resultAggressor":"base:lava","resultAggressorId":8,"resultVictim":"base:fire","resultVictimId":12,"spawn":"base:smoke","spawnId":11},
    {"aggressor":"base:lava","victim":"base:plant","aggressorId":8,"victimId":20,"chance":0.3,"resultAggressor":"base:lava","resultAggressorId":8,"resultVictim":"base:fire","resultVictimId":12,"spawn":null,"spawnId":null},
    {"aggressor":"base:lava","victim":"base:dirt","aggressorId":8,"victimId":18,"chance":0.1,"resultAggressor":"base:lava","resultAggressorId":8,"resultVictim":"base:stone","resultVictimId":1,"spawn":null,"spawnId":null},
    {"aggressor":"base:acid","victim":"base:stone","aggressorId":9,"victimId":1,"chance":0.05,"resultAggressor":"base:acid","resultAggressorId":9,"resultVictim":"base:empty","resultVictimId":0,"spawn":"base:smoke","spawnId":11},
    {"aggressor":"base:acid","victim":"base:metal","aggressorId":9,"victimId":4,"chance":0.03,"resultAggressor":"base:acid","resultAggressorId":9,"resultVictim":"base:empty","resultVictimId":0,"spawn":"base:smoke","spawnId":11},
    {"aggressor":"base:acid","victim":"base:wood","aggressorId":9,"victimId":3,"chance":0.08,"resultAggressor":"base:acid","resultAggressorId":9,"resultVictim":"base:empty","resultVictimId":0,"spawn":null,"spawnId":null},
    {"aggressor":"base:acid","victim":"base:ice","aggressorId":9,"victimId":5,"chance":0.5,"resultAggressor":"base:acid","resultAggressorId":9,"resultVictim":"base:water","resultVictimId":6,"spawn":null,"spawnId":null},
    {"aggressor":"base:acid","victim":"base:plant","aggressorId":9,"victimId":20,"chance":0.2,"resultAggressor":"base:acid","resultAggressorId":9,"resultVictim":"base:empty","resultVictimId":0,"spawn":null,"spawnId":null},
    {"aggressor":"base:acid","victim":"base:dirt","aggressorId":9,"victimId":18,"chance":0.1,"resultAggressor":"base:acid","resultAggressorId":9,"resultVictim":"base:empty","resultVictimId":0,"spawn":null,"spawnId":null},
    {"aggressor":"base:water","victim":"base:lava","aggressorId":6,"victimId":8,"chance":0.6,"resultAggressor":"base:steam","resultAggressorId":10,"resultVictim":"base:stone","resultVictimId":1,"spawn":null,"spawnId":null},
    {"aggressor":"base:water","victim":"base:fire","aggressorId":6,"victimId":12,"chance":0.8,"resultAggressor":"base:water","resultAggressorId":6,"resultVictim":"base:empty","resultVictimId":0,"spawn":null,"spawnId":null}
  ]
}"#;
